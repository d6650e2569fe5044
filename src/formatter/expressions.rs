use super::cursor::starts_with_query;
use super::{CASE_BRANCH_INDENT, StatementFormatter};
use crate::error::FormatError;
use crate::token::{KeywordKind, Token};

impl<'o, 't, 'a> StatementFormatter<'o, 't, 'a> {
    /// Handles a token that is part of an expression, opening nested constructs
    /// where one starts.
    pub(super) fn format_expression_token(&mut self, token: &'t Token<'a>) -> Result<(), FormatError> {
        match token {
            Token::OpenParen => self.format_paren(token)?,
            Token::Keyword(KeywordKind::Case) if !self.after_dot() => self.format_case(token),
            Token::Identifier(name)
                if name.eq_ignore_ascii_case("decode")
                    && matches!(self.cursor.peek(), Some(Token::OpenParen)) =>
            {
                self.format_decode(token)?
            }
            Token::LineComment(_) | Token::BlockComment(_) => self.emit_comment(token),
            _ => self.emit(token),
        }
        Ok(())
    }

    /// Called with `(` already consumed.
    pub(super) fn format_paren(&mut self, open: &'t Token<'a>) -> Result<(), FormatError> {
        let after_introducer = matches!(
            self.prev,
            Some(Token::Keyword(kw)) if kw.introduces_subselect()
        );
        let (inner, close) = self.cursor.take_group()?;
        if starts_with_query(inner) {
            self.format_subselect(open, inner, close);
        } else if after_introducer {
            self.format_in_list(open, inner, close);
        } else {
            self.format_group(open, inner, close);
        }
        Ok(())
    }

    /// Function arguments and grouped expressions stay on the current line.
    pub(super) fn format_group(
        &mut self,
        open: &'t Token<'a>,
        inner: &'t [Token<'a>],
        close: &'t Token<'a>,
    ) {
        self.emit(open);
        let result = self.nested(inner, false, |f| f.format_inline());
        self.splice_or_echo(result, inner);
        self.emit(close);
    }

    // ── Subselects ──────────────────────────────────────────────────

    /// Formats the query on its own, then inlines it when it is short and has no
    /// line comment, or indents it under the opening parenthesis otherwise.
    pub(super) fn format_subselect(
        &mut self,
        open: &'t Token<'a>,
        inner: &'t [Token<'a>],
        close: &'t Token<'a>,
    ) {
        self.emit(open);
        match self.nested(inner, false, |f| f.format_statement()) {
            Ok(fragment)
                if fragment.real_length < self.options.max_subselect_length
                    && !fragment.has_line_comment =>
            {
                tracing::trace!(length = fragment.real_length, "collapsing subselect");
                self.splice_collapsed(&fragment, inner);
            }
            result => self.splice_or_echo(result, inner),
        }
        self.emit(close);
    }

    // ── CASE ────────────────────────────────────────────────────────

    fn format_case(&mut self, case: &'t Token<'a>) {
        match self.cursor.take_case() {
            Ok(tokens) => {
                let result = self.nested(tokens, true, |f| f.format_case_body());
                self.splice_or_echo(result, tokens);
            }
            Err(err) => {
                tracing::debug!(%err, "echoing CASE without END unformatted");
                self.emit(case);
                let rest = self.cursor.take_rest();
                self.echo_raw(rest);
            }
        }
    }

    /// `CASE` with each WHEN and ELSE on its own indented line and END back at
    /// the column of CASE.
    fn format_case_body(&mut self) -> Result<(), FormatError> {
        let Some(case) = self.cursor.next() else {
            return Err(FormatError::UnterminatedConstruct { construct: "CASE" });
        };
        self.emit(case);
        self.continuation = CASE_BRANCH_INDENT;
        while let Some(token) = self.cursor.next() {
            match token {
                Token::Keyword(KeywordKind::When | KeywordKind::Else) if !self.after_dot() => {
                    self.break_line(CASE_BRANCH_INDENT);
                    self.emit(token);
                }
                Token::Keyword(KeywordKind::End) if !self.after_dot() => {
                    self.break_line(0);
                    self.emit(token);
                    return Ok(());
                }
                _ => self.format_expression_token(token)?,
            }
        }
        Err(FormatError::UnterminatedConstruct { construct: "CASE" })
    }

    // ── DECODE ──────────────────────────────────────────────────────

    fn format_decode(&mut self, name: &'t Token<'a>) -> Result<(), FormatError> {
        self.emit(name);
        let Some(open) = self.cursor.next() else {
            return Ok(());
        };
        let (inner, close) = self.cursor.take_group()?;
        self.emit(open);
        let result = self.nested(inner, true, |f| f.format_decode_args());
        self.splice_or_echo(result, inner);
        self.emit(close);
        Ok(())
    }

    /// The tested expression, then one search/result pair per line.
    fn format_decode_args(&mut self) -> Result<(), FormatError> {
        let mut commas = 0usize;
        while let Some(token) = self.cursor.next() {
            match token {
                Token::Comma => {
                    self.emit(token);
                    if commas % 2 == 0 {
                        self.out.newline();
                    }
                    commas += 1;
                }
                _ => self.format_expression_token(token)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::FormatOptions;
    use crate::formatter::format_tokens;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn fmt_with(sql: &str, options: &FormatOptions) -> String {
        let tokens = tokenize(sql);
        format_tokens(&tokens, sql, options).unwrap()
    }

    fn fmt(sql: &str) -> String {
        fmt_with(sql, &FormatOptions::default())
    }

    #[test]
    fn test_short_subselect_is_collapsed() {
        let options = FormatOptions::default().with_max_subselect_length(20);
        assert_eq!(
            fmt_with("SELECT * FROM t WHERE x IN (SELECT id FROM u)", &options),
            "SELECT *\nFROM t\nWHERE x IN (SELECT id FROM u)"
        );
    }

    #[test]
    fn test_long_subselect_is_indented() {
        let options = FormatOptions::default().with_max_subselect_length(5);
        assert_eq!(
            fmt_with("SELECT * FROM t WHERE x IN (SELECT id FROM u)", &options),
            "SELECT *\nFROM t\nWHERE x IN (SELECT id\n            FROM u)"
        );
    }

    #[test]
    fn test_subselect_with_line_comment_is_never_collapsed() {
        assert_eq!(
            fmt("select * from t where x in (select id -- ids\n from u)"),
            "SELECT *\nFROM t\nWHERE x IN (SELECT id\n                   -- ids\n            FROM u)"
        );
    }

    #[test]
    fn test_exists_subselect() {
        assert_eq!(
            fmt("select * from wizards w where exists (select 1 from spells s where s.wizard_id = w.id)"),
            "SELECT *\nFROM wizards w\nWHERE EXISTS (SELECT 1 FROM spells s WHERE s.wizard_id = w.id)"
        );
    }

    #[test]
    fn test_derived_table() {
        assert_eq!(
            fmt("select * from (select a from t) x"),
            "SELECT *\nFROM (SELECT a FROM t) x"
        );
    }

    #[test]
    fn test_long_derived_table_is_indented_under_paren() {
        let options = FormatOptions::default().with_max_subselect_length(5);
        assert_eq!(
            fmt_with("select * from (select a, b from t where c = 1) x", &options),
            "SELECT *\nFROM (SELECT a,\n             b\n      FROM t\n      WHERE c = 1) x"
        );
    }

    #[test]
    fn test_scalar_subselect_in_select_list() {
        let options = FormatOptions::default().with_max_subselect_length(10);
        assert_eq!(
            fmt_with("select a, (select max(b) from u) as m from t", &options),
            "SELECT a,\n       (SELECT max(b)\n        FROM u) AS m\nFROM t"
        );
    }

    #[test]
    fn test_function_call_stays_inline() {
        assert_eq!(
            fmt("select coalesce(a, b, 0) from t"),
            "SELECT coalesce(a, b, 0)\nFROM t"
        );
    }

    #[test]
    fn test_case_layout() {
        assert_eq!(
            fmt("select case when a = 1 then 'x' else 'y' end as label from t"),
            "SELECT CASE\n         WHEN a = 1 THEN 'x'\n         ELSE 'y'\n       END AS label\nFROM t"
        );
    }

    #[test]
    fn test_nested_case() {
        assert_eq!(
            fmt("select case when a then case when b then 1 end end from t"),
            "SELECT CASE\n         WHEN a THEN CASE\n                       WHEN b THEN 1\n                     END\n       END\nFROM t"
        );
    }

    #[test]
    fn test_case_without_end_is_echoed() {
        assert_eq!(
            fmt("select case when a then 1 from t"),
            "SELECT CASE WHEN a THEN 1 FROM t"
        );
    }

    #[test]
    fn test_case_strips_newlines_from_literals() {
        assert_eq!(
            fmt("select case when a = 'x\ny' then 1 end from t"),
            "SELECT CASE\n         WHEN a = 'xy' THEN 1\n       END\nFROM t"
        );
    }

    #[test]
    fn test_literal_newlines_kept_outside_case() {
        assert_eq!(fmt("select 'x\ny' from t"), "SELECT 'x\ny'\nFROM t");
    }

    #[test]
    fn test_decode_pairs() {
        assert_eq!(
            fmt("select decode(status, 1, 'open', 2, 'closed', 'unknown') from t"),
            "SELECT decode(status,\n              1, 'open',\n              2, 'closed',\n              'unknown')\nFROM t"
        );
    }
}
