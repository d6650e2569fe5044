use crate::token::{KeywordKind, Token, lookup_keyword};

const TWO_WORD_KEYWORDS: &[(KeywordKind, &str, KeywordKind)] = &[
    (KeywordKind::Order, "BY", KeywordKind::OrderBy),
    (KeywordKind::Group, "BY", KeywordKind::GroupBy),
    (KeywordKind::Inner, "JOIN", KeywordKind::InnerJoin),
    (KeywordKind::Outer, "JOIN", KeywordKind::OuterJoin),
    (KeywordKind::Cross, "JOIN", KeywordKind::CrossJoin),
    (KeywordKind::Union, "ALL", KeywordKind::UnionAll),
    (KeywordKind::Primary, "KEY", KeywordKind::PrimaryKey),
    (KeywordKind::Foreign, "KEY", KeywordKind::ForeignKey),
];

const THREE_CHAR_OPS: &[&[u8]] = &[b"->>"];
const TWO_CHAR_OPS: &[&[u8]] = &[
    b"<>", b"!=", b"<=", b">=", b"||", b"::", b":=", b"=>", b"->",
];

/// Prefixes that turn a following single-quoted literal into one token (`N'..'`, `E'..'`).
const LITERAL_PREFIXES: &[u8] = b"NnEeXxBb";

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'@' || b == b'#' || b >= 0x80
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'#' | b'@') || b >= 0x80
}

struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        let b = self.peek()?;

        match b {
            b if b.is_ascii_whitespace() => Some(self.lex_whitespace()),

            b'-' if self.peek_at(1) == Some(b'-') => Some(self.lex_line_comment()),

            b'/' if self.peek_at(1) == Some(b'*') => Some(self.lex_block_comment()),

            b'\'' => {
                let start = self.pos;
                Some(Token::StringLiteral(self.lex_quoted(start, b'\'', false)))
            }

            b'"' | b'`' => {
                let start = self.pos;
                Some(Token::QuotedIdentifier(self.lex_quoted(start, b, false)))
            }

            b'$' => Some(self.lex_dollar()),

            b'0'..=b'9' => Some(self.lex_number()),

            b'.' if matches!(self.peek_at(1), Some(b'0'..=b'9')) => Some(self.lex_number()),

            b',' | b';' | b'.' | b'(' | b')' => {
                self.advance();
                Some(match b {
                    b',' => Token::Comma,
                    b';' => Token::Semicolon,
                    b'.' => Token::Dot,
                    b'(' => Token::OpenParen,
                    _ => Token::CloseParen,
                })
            }

            // Bind variable: :name
            b':' if self.peek_at(1).is_some_and(is_word_start) => {
                let start = self.pos;
                self.advance();
                self.skip_word_bytes();
                Some(Token::Identifier(self.slice(start, self.pos)))
            }

            b'<' | b'>' | b'!' | b'=' | b'|' | b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'^'
            | b'~' | b':' => Some(self.lex_operator()),

            b if is_word_start(b) => Some(self.lex_word()),

            // Unknown ASCII character: emit as single-char operator
            _ => {
                let start = self.pos;
                self.advance();
                Some(Token::Operator(self.slice(start, self.pos)))
            }
        }
    }

    fn lex_whitespace(&mut self) -> Token<'a> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        Token::Whitespace(self.slice(start, self.pos))
    }

    fn lex_line_comment(&mut self) -> Token<'a> {
        // Skip the '--'
        self.advance();
        self.advance();
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.advance();
        }
        Token::LineComment(self.slice(start, self.pos))
    }

    fn lex_block_comment(&mut self) -> Token<'a> {
        // Skip '/*'
        self.advance();
        self.advance();
        let start = self.pos;
        loop {
            match self.peek() {
                None => break, // unclosed: consume to end
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    let end = self.pos;
                    self.advance();
                    self.advance();
                    return Token::BlockComment(self.slice(start, end));
                }
                _ => {
                    self.advance();
                }
            }
        }
        Token::BlockComment(self.slice(start, self.pos))
    }

    /// Consumes a quoted run starting at the opening `quote` (at `self.pos`).
    /// The returned slice starts at `start` and includes both delimiters;
    /// unclosed runs consume to end of input.
    fn lex_quoted(&mut self, start: usize, quote: u8, backslash_escapes: bool) -> &'a str {
        self.scan_quoted(quote, backslash_escapes);
        self.slice(start, self.pos)
    }

    /// Moves past a quoted run starting at the opening quote. Doubled quotes are
    /// escapes, and so is `\` when `backslash_escapes` is set. Returns false when
    /// the input ends before the closing quote.
    fn scan_quoted(&mut self, quote: u8, backslash_escapes: bool) -> bool {
        self.advance();
        while let Some(b) = self.advance() {
            if backslash_escapes && b == b'\\' {
                self.advance();
            } else if b == quote {
                if self.peek() != Some(quote) {
                    return true;
                }
                self.advance();
            }
        }
        false
    }

    /// `$1` and `$name` parameters, or a `$tag$ ... $tag$` quoted body.
    fn lex_dollar(&mut self) -> Token<'a> {
        let start = self.pos;
        let input = self.input;
        if let Some(delimiter) = dollar_delimiter(&input[start..]) {
            let body = start + delimiter.len();
            self.pos = match input[body..].find(delimiter) {
                Some(offset) => body + offset + delimiter.len(),
                None => input.len(),
            };
            return Token::StringLiteral(self.slice(start, self.pos));
        }
        self.advance();
        if self.peek().is_some_and(is_word_byte) {
            self.skip_word_bytes();
            return Token::Identifier(self.slice(start, self.pos));
        }
        Token::Operator(self.slice(start, self.pos))
    }

    fn lex_number(&mut self) -> Token<'a> {
        let start = self.pos;
        // Integer part (may be empty if starting with '.')
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }
        // Decimal point followed by digits
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            self.advance();
            while let Some(b'0'..=b'9') = self.peek() {
                self.advance();
            }
        }
        // Exponent: 1e10, 2.5E-3
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let digits_at = match self.peek_at(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if matches!(self.peek_at(digits_at), Some(b'0'..=b'9')) {
                self.pos += digits_at;
                while let Some(b'0'..=b'9') = self.peek() {
                    self.advance();
                }
            }
        }
        // Suffixes and hex digits (0x1F, 10L) stay attached to the number
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        Token::NumberLiteral(self.slice(start, self.pos))
    }

    fn lex_operator(&mut self) -> Token<'a> {
        let remaining = &self.bytes[self.pos..];

        for &op in THREE_CHAR_OPS.iter().chain(TWO_CHAR_OPS) {
            if remaining.starts_with(op) {
                let start = self.pos;
                self.pos += op.len();
                return Token::Operator(self.slice(start, self.pos));
            }
        }

        let start = self.pos;
        self.advance();
        Token::Operator(self.slice(start, self.pos))
    }

    fn skip_word_bytes(&mut self) {
        while let Some(b) = self.peek() {
            if is_word_byte(b) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn lex_word(&mut self) -> Token<'a> {
        let start = self.pos;
        self.skip_word_bytes();

        if self.pos - start == 1
            && LITERAL_PREFIXES.contains(&self.bytes[start])
            && self.peek() == Some(b'\'')
        {
            let backslash_escapes = matches!(self.bytes[start], b'E' | b'e');
            return Token::StringLiteral(self.lex_quoted(start, b'\'', backslash_escapes));
        }

        let word = self.slice(start, self.pos);
        match lookup_keyword(word) {
            Some(kind) => self.try_combine_keyword(kind),
            None => Token::Identifier(word),
        }
    }

    /// Peek ahead past optional whitespace for a word.
    /// Returns (word_str, word_end_pos) if found.
    fn peek_word_after_whitespace(&self, from: usize) -> Option<(&'a str, usize)> {
        let mut p = from;
        while p < self.bytes.len() && self.bytes[p].is_ascii_whitespace() {
            p += 1;
        }
        if p >= self.bytes.len() || !is_word_start(self.bytes[p]) {
            return None;
        }
        let word_start = p;
        while p < self.bytes.len() && is_word_byte(self.bytes[p]) {
            p += 1;
        }
        Some((self.slice(word_start, p), p))
    }

    fn try_combine_keyword(&mut self, kind: KeywordKind) -> Token<'a> {
        for &(first, expected, combined) in TWO_WORD_KEYWORDS {
            if kind == first {
                return self.try_two_word(kind, expected, combined);
            }
        }
        match kind {
            KeywordKind::Left => self.try_keyword_combination(
                kind,
                ("JOIN", KeywordKind::LeftJoin),
                ("OUTER", "JOIN", KeywordKind::LeftOuterJoin),
            ),
            KeywordKind::Right => self.try_keyword_combination(
                kind,
                ("JOIN", KeywordKind::RightJoin),
                ("OUTER", "JOIN", KeywordKind::RightOuterJoin),
            ),
            KeywordKind::Full => self.try_keyword_combination(
                kind,
                ("JOIN", KeywordKind::FullJoin),
                ("OUTER", "JOIN", KeywordKind::FullOuterJoin),
            ),
            KeywordKind::If => self.try_keyword_combination(
                kind,
                ("EXISTS", KeywordKind::IfExists),
                ("NOT", "EXISTS", KeywordKind::IfNotExists),
            ),
            _ => Token::Keyword(kind),
        }
    }

    /// Try to combine a two-word keyword. If the next word (case-insensitive) matches
    /// `expected`, consume whitespace + word and return the combined variant.
    fn try_two_word(
        &mut self,
        standalone: KeywordKind,
        expected: &str,
        combined: KeywordKind,
    ) -> Token<'a> {
        if let Some((word, word_end)) = self.peek_word_after_whitespace(self.pos)
            && word.eq_ignore_ascii_case(expected)
        {
            self.pos = word_end;
            return Token::Keyword(combined);
        }
        Token::Keyword(standalone)
    }

    /// Two- or three-word combination:
    ///   LEFT JOIN        -> direct (LeftJoin)
    ///   LEFT OUTER JOIN  -> full (LeftOuterJoin)
    fn try_keyword_combination(
        &mut self,
        standalone: KeywordKind,
        direct: (&str, KeywordKind),
        full: (&str, &str, KeywordKind),
    ) -> Token<'a> {
        if let Some((word, word_end)) = self.peek_word_after_whitespace(self.pos) {
            if word.eq_ignore_ascii_case(direct.0) {
                self.pos = word_end;
                return Token::Keyword(direct.1);
            }
            if word.eq_ignore_ascii_case(full.0)
                && let Some((word2, word_end2)) = self.peek_word_after_whitespace(word_end)
                && word2.eq_ignore_ascii_case(full.1)
            {
                self.pos = word_end2;
                return Token::Keyword(full.2);
            }
        }
        Token::Keyword(standalone)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// The opening `$$` or `$tag$` of a dollar-quoted body at the start of `text`.
fn dollar_delimiter(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('$')?;
    let tag_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic() || *b == b'_')
        .count();
    rest[tag_len..]
        .starts_with('$')
        .then(|| &text[..tag_len + 2])
}

/// False for a string literal or quoted identifier token whose closing quote
/// is missing because the input ended first.
pub fn is_closed_quoted(text: &str) -> bool {
    if let Some(delimiter) = dollar_delimiter(text) {
        return text.len() >= 2 * delimiter.len() && text.ends_with(delimiter);
    }
    let bytes = text.as_bytes();
    let quote_at = usize::from(bytes.first().is_some_and(|b| LITERAL_PREFIXES.contains(b)));
    let Some(&quote) = bytes.get(quote_at) else {
        return false;
    };
    let backslash_escapes = quote_at == 1 && matches!(bytes[0], b'E' | b'e');
    let mut lexer = Lexer::new(text);
    lexer.pos = quote_at;
    lexer.scan_quoted(quote, backslash_escapes) && lexer.pos == text.len()
}

pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}
