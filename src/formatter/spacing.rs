use crate::token::Token;

/// Operators written without surrounding spaces.
const TIGHT_OPERATORS: &[&str] = &["::", "->", "->>"];

/// Decides whether a single space separates `prev` from `token` in the output.
///
/// Nothing is inserted at the start of a line or before the first token.
pub(crate) fn needs_space(prev: Option<&Token<'_>>, token: &Token<'_>, at_line_start: bool) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if at_line_start {
        return false;
    }

    match (prev, token) {
        (Token::Operator(p), Token::Operator(c))
            if matches!(*p, "<" | ">") && matches!(*c, "=" | "<" | ">") =>
        {
            false
        }
        (Token::Operator("="), _) | (_, Token::Operator("=")) => true,
        (Token::Operator(op), _) | (_, Token::Operator(op)) if TIGHT_OPERATORS.contains(op) => false,
        (Token::Dot, _) | (_, Token::Dot) => false,
        (Token::OpenParen, _) | (_, Token::CloseParen) => false,
        (_, Token::Comma | Token::Semicolon) => false,
        (Token::CloseParen, _) => true,
        // function call
        (Token::Identifier(_) | Token::QuotedIdentifier(_), Token::OpenParen) => false,
        (Token::Keyword(kw), Token::OpenParen) if kw.is_callable() => false,
        _ => true,
    }
}
