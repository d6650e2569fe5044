mod clauses;
mod cursor;
mod ddl;
mod expressions;
mod output;
mod spacing;
mod wb_command;

use std::borrow::Cow;

use crate::config::FormatOptions;
use crate::error::FormatError;
use crate::token::{GROUP_BY_TERMINAL, KeywordKind, SELECT_TERMINAL, SET_TERMINAL, Token};

use cursor::{Cursor, check_balance, check_quotes};
use output::{Fragment, Output};
use spacing::needs_space;

pub use ddl::align_definitions;

// ── Layout constants ────────────────────────────────────────────────

/// Continuation indent of the FROM list and of lines following a JOIN.
const FROM_INDENT: usize = 5;
/// Indent of items inside a `(` ... `)` block that sits on its own lines.
const BRACKET_LIST_INDENT: usize = 2;
const CASE_BRANCH_INDENT: usize = 2;
/// Column lists of CREATE INDEX that do not fit inline.
const INDEX_LIST_INDENT: usize = 7;
/// IN lists with more elements than this get one element per line.
const IN_LIST_WRAP_THRESHOLD: usize = 10;
/// CREATE INDEX column lists with more elements than this are laid out as a block.
const INDEX_WRAP_THRESHOLD: usize = 5;

static COMMA: Token<'static> = Token::Comma;

// ── Clause dispatch ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Clause {
    Select,
    Set,
    From,
    /// WHERE and HAVING share one layout.
    Where,
    GroupBy,
    Create,
    Values,
    Into,
    WbCommand,
    Other,
}

impl Clause {
    fn of(token: &Token<'_>, at_statement_start: bool) -> Self {
        match token {
            Token::Keyword(kw) => match kw {
                KeywordKind::Select => Clause::Select,
                KeywordKind::Set => Clause::Set,
                KeywordKind::From => Clause::From,
                KeywordKind::Where | KeywordKind::Having => Clause::Where,
                KeywordKind::GroupBy => Clause::GroupBy,
                KeywordKind::Create => Clause::Create,
                KeywordKind::Values => Clause::Values,
                KeywordKind::Into => Clause::Into,
                _ => Clause::Other,
            },
            Token::Identifier(word) if at_statement_start && wb_command::is_wb_verb(word) => {
                Clause::WbCommand
            }
            _ => Clause::Other,
        }
    }
}

// ── Statement formatter ─────────────────────────────────────────────

/// Lays out one token slice into its own [`Output`].
///
/// Every nested construct (subselect, CASE, DECODE, bracket lists) is handled by a
/// child formatter over the sub-slice between its delimiters. The child's text is
/// then spliced into the parent, indented to the column where it starts or
/// collapsed onto one line.
pub(crate) struct StatementFormatter<'o, 't, 'a> {
    cursor: Cursor<'t, 'a>,
    out: Output,
    options: &'o FormatOptions,
    /// Raw statement text, only set for the outermost formatter.
    source: &'o str,
    depth: usize,
    prev: Option<&'t Token<'a>>,
    /// Indent of the line that follows a `--` comment.
    continuation: usize,
    strip_literal_newlines: bool,
    saw_line_comment: bool,
}

impl<'o, 't, 'a> StatementFormatter<'o, 't, 'a> {
    pub(crate) fn new(tokens: &'t [Token<'a>], source: &'o str, options: &'o FormatOptions) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            out: Output::new(),
            options,
            source,
            depth: 0,
            prev: None,
            continuation: 0,
            strip_literal_newlines: false,
            saw_line_comment: false,
        }
    }

    fn child(&self, tokens: &'t [Token<'a>], strip_literal_newlines: bool) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            out: Output::new(),
            options: self.options,
            source: "",
            depth: self.depth + 1,
            prev: None,
            continuation: 0,
            strip_literal_newlines: self.strip_literal_newlines || strip_literal_newlines,
            saw_line_comment: false,
        }
    }

    /// Runs `layout` on a child formatter over `tokens`.
    fn nested<F>(
        &self,
        tokens: &'t [Token<'a>],
        strip_literal_newlines: bool,
        layout: F,
    ) -> Result<Fragment, FormatError>
    where
        F: FnOnce(&mut StatementFormatter<'o, 't, 'a>) -> Result<(), FormatError>,
    {
        if self.depth >= self.options.max_nesting_depth {
            return Err(FormatError::TooDeeplyNested {
                limit: self.options.max_nesting_depth,
            });
        }
        let mut child = self.child(tokens, strip_literal_newlines);
        layout(&mut child)?;
        Ok(child.into_fragment())
    }

    // ── Emitting ────────────────────────────────────────────────────

    fn render(&self, token: &'t Token<'a>) -> Cow<'a, str> {
        match token {
            Token::Keyword(kw) if !self.options.uppercase || self.after_dot() => {
                Cow::Owned(kw.as_str().to_lowercase())
            }
            Token::Keyword(kw) => Cow::Borrowed(kw.as_str()),
            Token::Identifier(name) if self.options.is_db_function(name) => {
                Cow::Owned(name.to_uppercase())
            }
            Token::StringLiteral(text)
                if self.strip_literal_newlines && text.contains(['\n', '\r']) =>
            {
                Cow::Owned(text.replace(['\n', '\r'], ""))
            }
            Token::Identifier(text)
            | Token::QuotedIdentifier(text)
            | Token::StringLiteral(text)
            | Token::NumberLiteral(text)
            | Token::Operator(text)
            | Token::Whitespace(text) => Cow::Borrowed(*text),
            Token::Comma => Cow::Borrowed(","),
            Token::Semicolon => Cow::Borrowed(";"),
            Token::Dot => Cow::Borrowed("."),
            Token::OpenParen => Cow::Borrowed("("),
            Token::CloseParen => Cow::Borrowed(")"),
            Token::LineComment(text) => Cow::Owned(format!("--{}", text.trim_end())),
            Token::BlockComment(text) => Cow::Owned(format!("/*{text}*/")),
        }
    }

    fn emit(&mut self, token: &'t Token<'a>) {
        if needs_space(self.prev, token, self.out.is_line_start()) {
            self.out.push_str(" ");
        }
        let text = self.render(token);
        self.out.push_str(&text);
        self.prev = Some(token);
    }

    /// Line comments get a line of their own; block comments stay inline.
    fn emit_comment(&mut self, token: &'t Token<'a>) {
        if !matches!(token, Token::LineComment(_)) {
            self.emit(token);
            return;
        }
        if !self.out.is_line_start() {
            self.out.newline();
            self.out.indent(self.continuation);
        }
        let text = self.render(token);
        self.out.push_str(&text);
        self.prev = Some(token);
        self.saw_line_comment = true;
        self.out.newline();
        self.out.indent(self.continuation);
    }

    /// A keyword right after `.` is a column or table name.
    fn after_dot(&self) -> bool {
        matches!(self.prev, Some(Token::Dot))
    }

    /// True when `token` ends a clause whose terminators are `set`.
    fn at_terminal(&self, token: &Token<'_>, set: &[KeywordKind]) -> bool {
        !self.after_dot() && token.terminates(set)
    }

    /// Starts a line at `indent`. A line holding only indentation is reused.
    fn break_line(&mut self, indent: usize) {
        if self.out.is_line_start() {
            self.out.clear_line();
        } else {
            self.out.newline();
        }
        self.out.indent(indent);
    }

    /// Appends a child's text, aligning its continuation lines under its first character.
    fn splice(&mut self, fragment: &Fragment, tokens: &'t [Token<'a>]) {
        if let Some(first) = tokens.first()
            && needs_space(self.prev, first, self.out.is_line_start())
        {
            self.out.push_str(" ");
        }
        let column = self.out.column();
        self.out.push_lines(&fragment.lines, column);
        self.saw_line_comment |= fragment.has_line_comment;
        if let Some(last) = tokens.last() {
            self.prev = Some(last);
        }
    }

    fn splice_collapsed(&mut self, fragment: &Fragment, tokens: &'t [Token<'a>]) {
        if let Some(first) = tokens.first()
            && needs_space(self.prev, first, self.out.is_line_start())
        {
            self.out.push_str(" ");
        }
        self.out.push_str(&fragment.collapsed());
        if let Some(last) = tokens.last() {
            self.prev = Some(last);
        }
    }

    fn splice_or_echo(&mut self, result: Result<Fragment, FormatError>, tokens: &'t [Token<'a>]) {
        match result {
            Ok(fragment) => self.splice(&fragment, tokens),
            Err(err) => {
                tracing::debug!(%err, tokens = tokens.len(), "echoing nested construct unformatted");
                self.echo_raw(tokens);
            }
        }
    }

    /// Writes `tokens` with spacing only, no layout.
    fn echo_raw(&mut self, tokens: &'t [Token<'a>]) {
        for token in tokens {
            self.emit_comment(token);
        }
    }

    // ── Driver ──────────────────────────────────────────────────────

    /// Formats every remaining token, dispatching clause keywords to their layouts.
    pub(crate) fn format_statement(&mut self) -> Result<(), FormatError> {
        while let Some(token) = self.cursor.next() {
            if self.after_dot() {
                self.format_expression_token(token)?;
                continue;
            }
            let at_start = self.depth == 0 && self.cursor.position() == 1;
            let clause = Clause::of(token, at_start);
            tracing::trace!(?clause, depth = self.depth, "dispatch");
            match clause {
                Clause::WbCommand => self.format_wb_command(),
                Clause::Other => self.format_plain(token)?,
                clause => {
                    self.emit_clause_keyword(token);
                    match clause {
                        Clause::Select => self.format_list(SELECT_TERMINAL, "SELECT ".len())?,
                        Clause::Set => self.format_list(SET_TERMINAL, "SET ".len())?,
                        Clause::GroupBy => self.format_list(GROUP_BY_TERMINAL, "GROUP BY ".len())?,
                        Clause::From => self.format_from()?,
                        Clause::Where => self.format_where()?,
                        Clause::Create => self.format_create()?,
                        Clause::Values => self.format_values()?,
                        Clause::Into => self.format_into()?,
                        Clause::WbCommand | Clause::Other => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn format_plain(&mut self, token: &'t Token<'a>) -> Result<(), FormatError> {
        match token {
            Token::Semicolon => {
                self.emit(token);
                self.out.newline();
                self.out.newline();
                Ok(())
            }
            // `WITH name AS (...)` keeps its query on the name's line
            Token::Keyword(KeywordKind::As) if self.in_with_clause() => {
                self.emit(token);
                Ok(())
            }
            Token::Keyword(kw) if kw.breaks_before() || kw.breaks_after() => {
                self.emit_clause_keyword(token);
                Ok(())
            }
            _ => self.format_expression_token(token),
        }
    }

    /// True when the innermost clause opened so far at this level is `WITH`.
    fn in_with_clause(&self) -> bool {
        let mut depth = 0isize;
        for token in self.cursor.consumed().iter().rev() {
            match token {
                Token::CloseParen => depth += 1,
                Token::OpenParen => depth -= 1,
                Token::Keyword(KeywordKind::With) if depth == 0 => return true,
                Token::Keyword(kw)
                    if depth == 0
                        && *kw != KeywordKind::As
                        && (kw.breaks_before() || *kw == KeywordKind::Create) =>
                {
                    return false;
                }
                _ => {}
            }
        }
        false
    }

    fn emit_clause_keyword(&mut self, token: &'t Token<'a>) {
        let Token::Keyword(kw) = token else {
            self.emit(token);
            return;
        };
        if kw.breaks_before() {
            self.break_line(0);
        }
        self.emit(token);
        if kw.breaks_after() {
            self.out.newline();
        }
    }

    fn format_wb_command(&mut self) {
        let text = self.source.trim();
        let text = text.strip_suffix(';').unwrap_or(text);
        let lines = wb_command::WbCommand::parse(text).render_lines();
        self.out.push_lines(&lines, 0);
        self.cursor.take_rest();
        if let Some(last) = self.cursor.last()
            && matches!(last, Token::Semicolon)
        {
            self.emit(last);
        }
    }

    // ── Results ─────────────────────────────────────────────────────

    fn into_fragment(self) -> Fragment {
        let ends_with_line_comment = matches!(self.prev, Some(Token::LineComment(_)));
        let real_length = self.out.real_length();
        let mut lines = self.out.into_lines();
        while lines.len() > 1 && lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        if let Some(last) = lines.last_mut() {
            let kept = last.trim_end().len();
            last.truncate(kept);
        }
        // the closing token must not end up inside the comment
        if ends_with_line_comment {
            lines.push(String::new());
        }
        Fragment {
            lines,
            real_length,
            has_line_comment: self.saw_line_comment,
        }
    }

    pub(crate) fn finish(self) -> String {
        let ends_with_semicolon = matches!(self.prev, Some(Token::Semicolon));
        let mut text = self.out.into_lines().join("\n");
        text.truncate(text.trim_end().len());
        if ends_with_semicolon {
            text.push_str("\n\n");
        }
        text
    }
}

/// Formats one statement given as tokens lexed from `source`.
///
/// Unbalanced parentheses fail the whole statement. Problems inside a nested
/// construct only cost that construct its layout.
pub fn format_tokens(
    tokens: &[Token<'_>],
    source: &str,
    options: &FormatOptions,
) -> Result<String, FormatError> {
    let significant: Vec<Token<'_>> = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Whitespace(_)))
        .cloned()
        .collect();
    if significant.is_empty() {
        return Ok(String::new());
    }

    let is_command = matches!(
        significant.first(),
        Some(Token::Identifier(word)) if wb_command::is_wb_verb(word)
    );
    if !is_command {
        check_quotes(&significant)?;
        check_balance(&significant)?;
    }

    let mut formatter = StatementFormatter::new(&significant, source, options);
    formatter.format_statement()?;
    Ok(formatter.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn fmt(sql: &str) -> String {
        fmt_with(sql, &FormatOptions::default())
    }

    fn fmt_with(sql: &str, options: &FormatOptions) -> String {
        let tokens = tokenize(sql);
        format_tokens(&tokens, sql, options).unwrap()
    }

    #[test]
    fn test_empty_tokens() {
        assert_eq!(format_tokens(&[], "", &FormatOptions::default()), Ok(String::new()));
        assert_eq!(fmt("   \n "), "");
    }

    #[test]
    fn test_select_list_one_column_per_line() {
        assert_eq!(
            fmt("select velocity, color from rockets"),
            "SELECT velocity,\n       color\nFROM rockets"
        );
    }

    #[test]
    fn test_lowercase_keywords() {
        let options = FormatOptions {
            uppercase: false,
            ..FormatOptions::default()
        };
        assert_eq!(
            fmt_with("SELECT a FROM potions WHERE b IS NULL", &options),
            "select a\nfrom potions\nwhere b is null"
        );
    }

    #[test]
    fn test_keyword_after_dot_is_lowercase() {
        assert_eq!(fmt("select t.select from t"), "SELECT t.select\nFROM t");
    }

    #[test]
    fn test_db_function_names_are_uppercased() {
        let options = FormatOptions::default().with_function_names(["nvl"]);
        assert_eq!(
            fmt_with("select nvl(a, 0) from dragons", &options),
            "SELECT NVL(a, 0)\nFROM dragons"
        );
    }

    #[test]
    fn test_semicolon_ends_with_blank_line() {
        assert_eq!(fmt("select 1;"), "SELECT 1;\n\n");
        assert_eq!(fmt("select 1; select 2"), "SELECT 1;\n\nSELECT 2");
    }

    #[test]
    fn test_keywords_called_as_functions_hug_their_parens() {
        assert_eq!(
            fmt("select left(name, 3), replace(a, 'x', 'y') from t"),
            "SELECT LEFT(name, 3),\n       REPLACE(a, 'x', 'y')\nFROM t"
        );
    }

    #[test]
    fn test_common_table_expressions_keep_as_inline() {
        assert_eq!(
            fmt("with x as (select 1 from dual), y as (select 2 from dual) select a from x, y"),
            "WITH x AS (SELECT 1 FROM dual), y AS (SELECT 2 FROM dual)\nSELECT a\nFROM x,\n     y"
        );
    }

    #[test]
    fn test_positional_parameters_stay_whole() {
        assert_eq!(
            fmt("select * from t where id = $1 and x = ?"),
            "SELECT *\nFROM t\nWHERE id = $1\nAND x = ?"
        );
    }

    #[test]
    fn test_escaped_quote_stays_inside_literal() {
        assert_eq!(
            fmt("select e'it\\'s' from t where a = 1"),
            "SELECT e'it\\'s'\nFROM t\nWHERE a = 1"
        );
    }

    #[test]
    fn test_unclosed_literal_fails() {
        let tokens = tokenize("select 'it\\'s' from t");
        assert_eq!(
            format_tokens(&tokens, "", &FormatOptions::default()),
            Err(FormatError::UnterminatedConstruct { construct: "string literal" })
        );
    }

    #[test]
    fn test_order_by_breaks_before() {
        assert_eq!(
            fmt("select tier from dragons order by tier desc"),
            "SELECT tier\nFROM dragons\nORDER BY tier DESC"
        );
    }

    #[test]
    fn test_group_by_list() {
        assert_eq!(
            fmt("select tier, count(*) from dragons group by tier, color having count(*) > 5"),
            "SELECT tier,\n       count(*)\nFROM dragons\nGROUP BY tier,\n         color\nHAVING count(*) > 5"
        );
    }

    #[test]
    fn test_union_starts_new_line() {
        assert_eq!(
            fmt("select a from t union all select b from u"),
            "SELECT a\nFROM t\nUNION ALL\nSELECT b\nFROM u"
        );
    }

    #[test]
    fn test_update_set_list() {
        assert_eq!(
            fmt("update t set a = 1, b = 2 where id = 1"),
            "UPDATE t\nSET a = 1,\n    b = 2\nWHERE id = 1"
        );
    }

    #[test]
    fn test_line_comment_gets_own_line() {
        assert_eq!(
            fmt("select a, -- first\n b from t"),
            "SELECT a,\n       -- first\n       b\nFROM t"
        );
    }

    #[test]
    fn test_block_comment_stays_inline() {
        assert_eq!(fmt("select /*+ hint */ a from t"), "SELECT /*+ hint */ a\nFROM t");
    }

    #[test]
    fn test_unbalanced_statement_fails() {
        let tokens = tokenize("select * from t where (a = 1");
        assert_eq!(
            format_tokens(&tokens, "", &FormatOptions::default()),
            Err(FormatError::UnbalancedBracket { depth: 1 })
        );
    }

    #[test]
    fn test_nesting_limit_echoes_inner_text() {
        let options = FormatOptions::default().with_max_nesting_depth(1);
        assert_eq!(
            fmt_with("select (1 + (2 * 3)) from t", &options),
            "SELECT (1 + (2 * 3))\nFROM t"
        );
        let options = FormatOptions::default()
            .with_max_nesting_depth(0)
            .with_max_subselect_length(100);
        assert_eq!(
            fmt_with("select * from t where x in (select id from u)", &options),
            "SELECT *\nFROM t\nWHERE x IN (SELECT id FROM u)"
        );
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        let result = fmt("select a ,\n b   from t   ");
        assert!(result.lines().all(|line| line == line.trim_end()));
    }

    #[test]
    fn test_clause_of() {
        assert_eq!(Clause::of(&Token::Keyword(KeywordKind::Having), false), Clause::Where);
        assert_eq!(Clause::of(&Token::Identifier("WbExport"), true), Clause::WbCommand);
        assert_eq!(Clause::of(&Token::Identifier("WbExport"), false), Clause::Other);
        assert_eq!(Clause::of(&Token::Keyword(KeywordKind::And), false), Clause::Other);
    }
}
