use std::collections::HashSet;

/// Subselects whose formatted body has fewer non-whitespace characters than this are inlined.
pub const DEFAULT_MAX_SUBSELECT_LENGTH: usize = 60;

/// Nested constructs beyond this depth are echoed without layout.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub uppercase: bool,
    pub max_subselect_length: usize,
    /// Upper-cased names of functions known to the database.
    pub db_function_names: HashSet<String>,
    pub max_nesting_depth: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            uppercase: true,
            max_subselect_length: DEFAULT_MAX_SUBSELECT_LENGTH,
            db_function_names: HashSet::new(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl FormatOptions {
    pub fn with_max_subselect_length(mut self, length: usize) -> Self {
        self.max_subselect_length = length;
        self
    }

    pub fn with_function_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.db_function_names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_uppercase())
            .filter(|name| !name.is_empty())
            .collect();
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn is_db_function(&self, name: &str) -> bool {
        !self.db_function_names.is_empty()
            && self.db_function_names.contains(&name.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_options() {
        let opts = FormatOptions::default();
        assert!(opts.uppercase);
        assert_eq!(opts.max_subselect_length, 60);
        assert_eq!(opts.max_nesting_depth, 64);
        assert!(opts.db_function_names.is_empty());
    }

    #[test]
    fn test_format_options_equality() {
        let a = FormatOptions::default();
        let b = FormatOptions::default();
        assert_eq!(a, b);

        let c = FormatOptions::default().with_max_subselect_length(20);
        assert_ne!(a, c);
    }

    #[test]
    fn test_function_names_are_case_insensitive() {
        let opts = FormatOptions::default().with_function_names(["nvl", " Coalesce ", ""]);
        assert_eq!(opts.db_function_names.len(), 2);
        assert!(opts.is_db_function("NVL"));
        assert!(opts.is_db_function("coalesce"));
        assert!(!opts.is_db_function("decode"));
    }
}
