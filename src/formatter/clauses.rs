use super::cursor::{split_commas, starts_with_query};
use super::{BRACKET_LIST_INDENT, COMMA, FROM_INDENT, IN_LIST_WRAP_THRESHOLD, StatementFormatter};
use crate::error::FormatError;
use crate::token::{FROM_TERMINAL, KeywordKind, Token, WHERE_TERMINAL};

impl<'o, 't, 'a> StatementFormatter<'o, 't, 'a> {
    // ── Comma lists ─────────────────────────────────────────────────

    /// SELECT, SET and GROUP BY lists: one element per line, continuation lines
    /// aligned `indent` columns in, ending at the first keyword of `terminal`.
    pub(super) fn format_list(
        &mut self,
        terminal: &[KeywordKind],
        indent: usize,
    ) -> Result<(), FormatError> {
        self.continuation = indent;
        while let Some(token) = self.cursor.peek() {
            if self.at_terminal(token, terminal) {
                break;
            }
            self.cursor.next();
            match token {
                Token::Comma => {
                    self.emit(token);
                    self.break_line(indent);
                }
                _ => self.format_expression_token(token)?,
            }
        }
        self.continuation = 0;
        Ok(())
    }

    /// Body of a bracket list: every element on its own line.
    pub(super) fn format_comma_list(&mut self) -> Result<(), FormatError> {
        while let Some(token) = self.cursor.next() {
            match token {
                Token::Comma => {
                    self.emit(token);
                    self.out.newline();
                }
                _ => self.format_expression_token(token)?,
            }
        }
        Ok(())
    }

    /// Tokens laid out on one line; parentheses still open nested constructs.
    pub(super) fn format_inline(&mut self) -> Result<(), FormatError> {
        while let Some(token) = self.cursor.next() {
            self.format_expression_token(token)?;
        }
        Ok(())
    }

    // ── FROM ────────────────────────────────────────────────────────

    pub(super) fn format_from(&mut self) -> Result<(), FormatError> {
        self.continuation = FROM_INDENT;
        while let Some(token) = self.cursor.peek() {
            if self.at_terminal(token, FROM_TERMINAL) {
                break;
            }
            self.cursor.next();
            match token {
                Token::Comma => {
                    self.emit(token);
                    self.break_line(FROM_INDENT);
                }
                Token::Keyword(kw) if kw.is_join_keyword() && !self.after_dot() => {
                    self.emit(token);
                    self.break_line(FROM_INDENT);
                }
                _ => self.format_expression_token(token)?,
            }
        }
        self.continuation = 0;
        Ok(())
    }

    // ── WHERE / HAVING ──────────────────────────────────────────────

    /// Conditions stream on one line; AND and OR outside parentheses start a new
    /// one, OR shifted right by a column.
    pub(super) fn format_where(&mut self) -> Result<(), FormatError> {
        let mut depth = 0usize;
        let mut in_between = false;
        while let Some(token) = self.cursor.peek() {
            if depth == 0 && self.at_terminal(token, WHERE_TERMINAL) {
                break;
            }
            self.cursor.next();
            match token {
                Token::Keyword(KeywordKind::Between) => {
                    in_between = depth == 0;
                    self.emit(token);
                }
                Token::Keyword(KeywordKind::And) if depth == 0 && in_between => {
                    in_between = false;
                    self.emit(token);
                }
                Token::Keyword(kw @ (KeywordKind::And | KeywordKind::Or)) if depth == 0 => {
                    self.break_line(if *kw == KeywordKind::Or { 1 } else { 0 });
                    self.emit(token);
                }
                Token::OpenParen => {
                    let after_introducer = matches!(
                        self.prev,
                        Some(Token::Keyword(kw)) if kw.introduces_subselect()
                    );
                    if after_introducer || starts_with_query(self.cursor.remaining()) {
                        self.format_paren(token)?;
                    } else {
                        self.emit(token);
                        depth += 1;
                    }
                }
                Token::CloseParen => {
                    depth = depth.saturating_sub(1);
                    self.emit(token);
                }
                _ => self.format_expression_token(token)?,
            }
        }
        Ok(())
    }

    // ── INSERT targets ──────────────────────────────────────────────

    /// `INTO name (columns)`: the column list becomes a bracket list.
    pub(super) fn format_into(&mut self) -> Result<(), FormatError> {
        while let Some(token) = self.cursor.peek() {
            match token {
                Token::OpenParen => {
                    self.cursor.next();
                    let (inner, close) = self.cursor.take_group()?;
                    if starts_with_query(inner) {
                        self.format_subselect(token, inner, close);
                    } else {
                        self.format_bracket_list(token, inner, close);
                    }
                    break;
                }
                Token::Semicolon | Token::Comma => break,
                Token::Keyword(kw) if kw.breaks_before() && !self.after_dot() => break,
                _ => {
                    self.cursor.next();
                    self.format_expression_token(token)?;
                }
            }
        }
        Ok(())
    }

    /// `VALUES (..), (..)`: every row is a bracket list.
    pub(super) fn format_values(&mut self) -> Result<(), FormatError> {
        while let Some(token) = self.cursor.peek() {
            match token {
                Token::OpenParen => {
                    self.cursor.next();
                    let (inner, close) = self.cursor.take_group()?;
                    if starts_with_query(inner) {
                        self.format_subselect(token, inner, close);
                    } else {
                        self.format_bracket_list(token, inner, close);
                    }
                }
                Token::Comma => {
                    self.cursor.next();
                    self.emit(token);
                }
                Token::LineComment(_) | Token::BlockComment(_) => {
                    self.cursor.next();
                    self.emit_comment(token);
                }
                _ => break,
            }
        }
        Ok(())
    }

    // ── Bracketed lists ─────────────────────────────────────────────

    /// `(` and `)` on lines of their own, one element per line between them.
    pub(super) fn format_bracket_list(
        &mut self,
        open: &'t Token<'a>,
        inner: &'t [Token<'a>],
        close: &'t Token<'a>,
    ) {
        self.format_bracket_block(open, inner, close, BRACKET_LIST_INDENT);
    }

    pub(super) fn format_bracket_block(
        &mut self,
        open: &'t Token<'a>,
        inner: &'t [Token<'a>],
        close: &'t Token<'a>,
        indent: usize,
    ) {
        if inner.is_empty() {
            self.emit(open);
            self.emit(close);
            return;
        }
        self.break_line(0);
        self.emit(open);
        self.break_line(indent);
        let result = self.nested(inner, false, |f| f.format_comma_list());
        self.splice_or_echo(result, inner);
        self.break_line(0);
        self.emit(close);
    }

    /// Elements of `IN (...)`: one line when short, otherwise one per line under
    /// the first element.
    pub(super) fn format_in_list(
        &mut self,
        open: &'t Token<'a>,
        inner: &'t [Token<'a>],
        close: &'t Token<'a>,
    ) {
        let elements = split_commas(inner);
        let wrap = elements.len() > IN_LIST_WRAP_THRESHOLD;
        self.emit(open);
        let column = self.out.column();
        for (i, element) in elements.into_iter().enumerate() {
            if i > 0 {
                self.emit(&COMMA);
                if wrap {
                    self.break_line(column);
                }
            }
            let result = self.nested(element, false, |f| f.format_inline());
            self.splice_or_echo(result, element);
        }
        self.emit(close);
    }
}
