use thiserror::Error;

/// Errors raised while laying out a statement or one of its nested constructs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A parenthesis was opened but never closed, or closed without being opened.
    #[error("unbalanced bracket (net depth {depth})")]
    UnbalancedBracket { depth: isize },

    /// A CASE, DECODE, subselect or quoted token ran out of input before its terminator.
    #[error("unterminated {construct}")]
    UnterminatedConstruct { construct: &'static str },

    #[error("nesting exceeds the limit of {limit} levels")]
    TooDeeplyNested { limit: usize },
}

/// A statement that could not be formatted, together with the untouched input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot format statement: {error}")]
pub struct FormatFailure {
    #[source]
    pub error: FormatError,
    pub original: String,
}

impl FormatFailure {
    pub fn new(error: FormatError, original: &str) -> Self {
        Self {
            error,
            original: original.to_string(),
        }
    }

    pub fn into_original(self) -> String {
        self.original
    }
}
