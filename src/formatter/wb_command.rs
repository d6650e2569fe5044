//! Client-side extension commands such as `WbExport` or `WbImport`.
//!
//! These are not SQL: they take `-option=value` style arguments and are laid
//! out from their raw text with one option per line.

const VERB_PREFIX: &str = "wb";
const OPTION_INDENT: usize = 2;

/// True for words such as `WbExport`: the `wb` prefix (any case) followed by letters.
pub(crate) fn is_wb_verb(word: &str) -> bool {
    word.len() > VERB_PREFIX.len()
        && word
            .get(..VERB_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(VERB_PREFIX))
        && word[VERB_PREFIX.len()..].chars().all(|c| c.is_ascii_alphabetic())
}

/// `WBexport` for `wbExport`, `WBEXPORT` or `WbExport`.
fn canonical_verb(verb: &str) -> String {
    match verb.get(..VERB_PREFIX.len()) {
        Some(prefix) => format!(
            "{}{}",
            prefix.to_uppercase(),
            verb[VERB_PREFIX.len()..].to_lowercase()
        ),
        None => verb.to_string(),
    }
}

fn is_quoted(value: &str) -> bool {
    value.starts_with(['\'', '"'])
}

/// Unquoted values are lower-cased; quoted ones are kept verbatim.
fn normalize_value(value: &str) -> String {
    if is_quoted(value) {
        value.to_string()
    } else {
        value.to_lowercase()
    }
}

/// Splits at whitespace outside single or double quotes.
fn split_arguments(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut quote: Option<char> = None;
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    words.push(&text[s..i]);
                }
                continue;
            }
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {}
        }
        start.get_or_insert(i);
    }
    if let Some(s) = start {
        words.push(&text[s..]);
    }
    words
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct WbOption<'a> {
    name: &'a str,
    /// Value written as `-name=value`.
    assigned: Option<&'a str>,
    /// Values following the option as separate words.
    values: Vec<&'a str>,
}

impl WbOption<'_> {
    fn render(&self) -> String {
        let mut line = format!("{:OPTION_INDENT$}{}", "", self.name);
        if let Some(value) = self.assigned {
            line.push('=');
            line.push_str(&normalize_value(value));
        }
        for value in &self.values {
            line.push(' ');
            line.push_str(&normalize_value(value));
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WbCommand<'a> {
    verb: &'a str,
    /// Positional words before the first option.
    arguments: Vec<&'a str>,
    options: Vec<WbOption<'a>>,
}

impl<'a> WbCommand<'a> {
    /// Parses the command text without its trailing `;`.
    pub(crate) fn parse(text: &'a str) -> Self {
        let mut words = split_arguments(text).into_iter();
        let verb = words.next().unwrap_or_default();
        let mut arguments = Vec::new();
        let mut options: Vec<WbOption<'a>> = Vec::new();
        for word in words {
            if word.len() > 1 && word.starts_with('-') {
                let (name, assigned) = match word.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (word, None),
                };
                options.push(WbOption {
                    name,
                    assigned,
                    values: Vec::new(),
                });
            } else if let Some(option) = options.last_mut() {
                option.values.push(word);
            } else {
                arguments.push(word);
            }
        }
        Self {
            verb,
            arguments,
            options,
        }
    }

    pub(crate) fn render_lines(&self) -> Vec<String> {
        let mut first = canonical_verb(self.verb);
        for argument in &self.arguments {
            first.push(' ');
            first.push_str(argument);
        }
        std::iter::once(first)
            .chain(self.options.iter().map(WbOption::render))
            .collect()
    }
}
