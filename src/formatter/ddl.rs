use super::cursor::split_commas;
use super::{BRACKET_LIST_INDENT, INDEX_LIST_INDENT, INDEX_WRAP_THRESHOLD, StatementFormatter};
use crate::error::FormatError;
use crate::token::{KeywordKind, Token};

/// Pads every name to the widest name plus two columns, so all remainders start
/// in the same column. Every line but the last ends with a comma.
///
/// ```
/// use wb_sql_format::formatter::align_definitions;
///
/// let lines = align_definitions(
///     &[("id".into(), "INTEGER".into()), ("name".into(), "VARCHAR(20)".into())],
///     2,
/// );
/// assert_eq!(lines, vec!["  id    INTEGER,", "  name  VARCHAR(20)"]);
/// ```
pub fn align_definitions(definitions: &[(String, String)], indent: usize) -> Vec<String> {
    let width = definitions
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        + 2;
    let last = definitions.len().saturating_sub(1);
    definitions
        .iter()
        .enumerate()
        .map(|(i, (name, remainder))| {
            let mut line = format!("{:indent$}{name}", "");
            if !remainder.is_empty() {
                line.extend(std::iter::repeat_n(' ', width - name.chars().count()));
                line.push_str(remainder);
            }
            if i < last {
                line.push(',');
            }
            line
        })
        .collect()
}

impl<'o, 't, 'a> StatementFormatter<'o, 't, 'a> {
    /// Everything between CREATE and the object keyword (`OR REPLACE`, `UNIQUE`,
    /// `MATERIALIZED`, ...) stays on the CREATE line.
    pub(super) fn format_create(&mut self) -> Result<(), FormatError> {
        while let Some(token) = self.cursor.peek() {
            match token {
                Token::Keyword(KeywordKind::Table | KeywordKind::View) => {
                    self.cursor.next();
                    self.emit(token);
                    return self.format_create_object();
                }
                Token::Keyword(KeywordKind::Index) => {
                    self.cursor.next();
                    self.emit(token);
                    return self.format_create_index();
                }
                Token::Keyword(kw) if kw.breaks_before() => return Ok(()),
                Token::Semicolon | Token::OpenParen => return Ok(()),
                _ => {
                    self.cursor.next();
                    self.format_expression_token(token)?;
                }
            }
        }
        Ok(())
    }

    /// Table or view name, then its column list with aligned types.
    fn format_create_object(&mut self) -> Result<(), FormatError> {
        while let Some(token) = self.cursor.peek() {
            match token {
                Token::OpenParen => {
                    self.cursor.next();
                    let (inner, close) = self.cursor.take_group()?;
                    self.format_definitions(token, inner, close);
                    return Ok(());
                }
                Token::Keyword(kw) if kw.breaks_before() && !self.after_dot() => return Ok(()),
                Token::Semicolon => return Ok(()),
                _ => {
                    self.cursor.next();
                    self.format_expression_token(token)?;
                }
            }
        }
        Ok(())
    }

    fn format_definitions(&mut self, open: &'t Token<'a>, inner: &'t [Token<'a>], close: &'t Token<'a>) {
        if inner.is_empty() || inner.iter().any(Token::is_comment) {
            self.format_bracket_list(open, inner, close);
            return;
        }
        let definitions: Vec<(String, String)> = split_commas(inner)
            .into_iter()
            .map(|definition| match definition.split_first() {
                Some((name, rest)) => (
                    self.render_inline(std::slice::from_ref(name)),
                    self.render_inline(rest),
                ),
                None => (String::new(), String::new()),
            })
            .collect();

        self.break_line(0);
        self.emit(open);
        for line in align_definitions(&definitions, BRACKET_LIST_INDENT) {
            self.out.newline();
            self.out.push_str(&line);
        }
        if let Some(last) = inner.last() {
            self.prev = Some(last);
        }
        self.break_line(0);
        self.emit(close);
    }

    /// Lays out `tokens` on a single line.
    fn render_inline(&self, tokens: &'t [Token<'a>]) -> String {
        let fragment = match self.nested(tokens, false, |f| f.format_inline()) {
            Ok(fragment) => fragment,
            Err(err) => {
                tracing::debug!(%err, "echoing column definition unformatted");
                let mut child = self.child(tokens, false);
                child.echo_raw(tokens);
                child.into_fragment()
            }
        };
        fragment.collapsed()
    }

    /// `ON` starts a line; the column list stays inline unless it is long.
    fn format_create_index(&mut self) -> Result<(), FormatError> {
        while let Some(token) = self.cursor.peek() {
            match token {
                Token::Keyword(KeywordKind::On) => {
                    self.cursor.next();
                    self.break_line(0);
                    self.emit(token);
                }
                Token::OpenParen => {
                    self.cursor.next();
                    let (inner, close) = self.cursor.take_group()?;
                    if split_commas(inner).len() > INDEX_WRAP_THRESHOLD {
                        self.format_bracket_block(token, inner, close, INDEX_LIST_INDENT);
                    } else {
                        self.format_group(token, inner, close);
                    }
                    return Ok(());
                }
                Token::Keyword(kw) if kw.breaks_before() => return Ok(()),
                Token::Semicolon => return Ok(()),
                _ => {
                    self.cursor.next();
                    self.format_expression_token(token)?;
                }
            }
        }
        Ok(())
    }
}
