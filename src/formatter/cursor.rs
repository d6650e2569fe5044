use crate::error::FormatError;
use crate::lexer::is_closed_quoted;
use crate::token::{KeywordKind, Token};

/// Forward-only view over a slice of significant tokens.
///
/// Nested constructs get their own cursor over a sub-slice, so no position is
/// ever shared between a formatter and its children.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> Cursor<'t, 'a> {
    pub(crate) fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn next(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn consumed(&self) -> &'t [Token<'a>] {
        self.tokens.get(..self.pos).unwrap_or(self.tokens)
    }

    pub(crate) fn remaining(&self) -> &'t [Token<'a>] {
        self.tokens.get(self.pos..).unwrap_or(&[])
    }

    pub(crate) fn last(&self) -> Option<&'t Token<'a>> {
        self.tokens.last()
    }

    /// Consumes and returns everything that is left.
    pub(crate) fn take_rest(&mut self) -> &'t [Token<'a>] {
        let rest = self.remaining();
        self.pos = self.tokens.len();
        rest
    }

    /// Called right after an opening parenthesis was consumed. Returns the tokens
    /// up to the matching `)` together with that token, and moves past it.
    pub(crate) fn take_group(&mut self) -> Result<(&'t [Token<'a>], &'t Token<'a>), FormatError> {
        let start = self.pos;
        let mut depth = 1isize;
        for (i, token) in self.tokens.iter().enumerate().skip(start) {
            match token {
                Token::OpenParen => depth += 1,
                Token::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos = i + 1;
                        return Ok((&self.tokens[start..i], token));
                    }
                }
                _ => {}
            }
        }
        Err(FormatError::UnbalancedBracket { depth })
    }

    /// Called right after `CASE` was consumed. Returns `CASE ... END` including
    /// both keywords; nested CASE expressions are skipped over.
    pub(crate) fn take_case(&mut self) -> Result<&'t [Token<'a>], FormatError> {
        let start = self.pos.saturating_sub(1);
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(start) {
            match token {
                Token::Keyword(KeywordKind::Case) => depth += 1,
                Token::Keyword(KeywordKind::End) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.pos = i + 1;
                        return Ok(&self.tokens[start..=i]);
                    }
                }
                _ => {}
            }
        }
        Err(FormatError::UnterminatedConstruct { construct: "CASE" })
    }
}

/// Fails when parentheses in `tokens` do not pair up.
pub(crate) fn check_balance(tokens: &[Token<'_>]) -> Result<(), FormatError> {
    let mut depth = 0isize;
    for token in tokens {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => {
                depth -= 1;
                if depth < 0 {
                    return Err(FormatError::UnbalancedBracket { depth });
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(FormatError::UnbalancedBracket { depth });
    }
    Ok(())
}

/// Fails on a literal or quoted identifier that runs to the end of the input
/// without its closing quote.
pub(crate) fn check_quotes(tokens: &[Token<'_>]) -> Result<(), FormatError> {
    for token in tokens {
        let construct = match token {
            Token::StringLiteral(text) if !is_closed_quoted(text) => "string literal",
            Token::QuotedIdentifier(text) if !is_closed_quoted(text) => "quoted identifier",
            _ => continue,
        };
        return Err(FormatError::UnterminatedConstruct { construct });
    }
    Ok(())
}

/// Splits `tokens` at commas that are not inside parentheses.
pub(crate) fn split_commas<'t, 'a>(tokens: &'t [Token<'a>]) -> Vec<&'t [Token<'a>]> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// True when the first non-comment token opens a query.
pub(crate) fn starts_with_query(tokens: &[Token<'_>]) -> bool {
    matches!(
        tokens.iter().find(|t| !t.is_comment()),
        Some(Token::Keyword(KeywordKind::Select | KeywordKind::With))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn significant(sql: &str) -> Vec<Token<'_>> {
        tokenize(sql)
            .into_iter()
            .filter(|t| !matches!(t, Token::Whitespace(_)))
            .collect()
    }

    #[test]
    fn test_take_group_returns_inner_tokens() {
        let tokens = significant("(a, (b)) c");
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.next(), Some(&Token::OpenParen));
        let (inner, close) = cursor.take_group().unwrap();
        assert_eq!(inner.len(), 5);
        assert_eq!(close, &Token::CloseParen);
        assert_eq!(cursor.next(), Some(&Token::Identifier("c")));
    }

    #[test]
    fn test_take_group_unbalanced() {
        let tokens = significant("(a, (b)");
        let mut cursor = Cursor::new(&tokens);
        cursor.next();
        assert_eq!(
            cursor.take_group(),
            Err(FormatError::UnbalancedBracket { depth: 1 })
        );
    }

    #[test]
    fn test_take_case_skips_nested_case() {
        let tokens = significant("CASE WHEN a THEN CASE b WHEN 1 THEN 2 END END x");
        let mut cursor = Cursor::new(&tokens);
        cursor.next();
        let case = cursor.take_case().unwrap();
        assert_eq!(case.first(), Some(&Token::Keyword(KeywordKind::Case)));
        assert_eq!(case.last(), Some(&Token::Keyword(KeywordKind::End)));
        assert_eq!(cursor.next(), Some(&Token::Identifier("x")));
    }

    #[test]
    fn test_take_case_without_end() {
        let tokens = significant("CASE WHEN a THEN 1");
        let mut cursor = Cursor::new(&tokens);
        cursor.next();
        assert_eq!(
            cursor.take_case(),
            Err(FormatError::UnterminatedConstruct { construct: "CASE" })
        );
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_check_balance() {
        assert!(check_balance(&significant("f(a, (b))")).is_ok());
        assert_eq!(
            check_balance(&significant("(a")),
            Err(FormatError::UnbalancedBracket { depth: 1 })
        );
        assert_eq!(
            check_balance(&significant("a)(")),
            Err(FormatError::UnbalancedBracket { depth: -1 })
        );
    }

    #[test]
    fn test_check_quotes() {
        assert!(check_quotes(&significant("'it''s', e'it\\'s', \"a\", $$x$$")).is_ok());
        assert_eq!(
            check_quotes(&significant("'it\\'s'")),
            Err(FormatError::UnterminatedConstruct { construct: "string literal" })
        );
        assert_eq!(
            check_quotes(&significant("select \"open")),
            Err(FormatError::UnterminatedConstruct { construct: "quoted identifier" })
        );
    }

    #[test]
    fn test_split_commas_ignores_nested_commas() {
        let tokens = significant("a, f(b, c), d");
        let parts = split_commas(&tokens);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 6);
        assert!(split_commas(&[]).is_empty());
    }

    #[test]
    fn test_starts_with_query() {
        assert!(starts_with_query(&significant("select 1")));
        assert!(starts_with_query(&significant("/* hint */ select 1")));
        assert!(!starts_with_query(&significant("1, 2")));
    }
}
