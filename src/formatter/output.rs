/// Line-aware text buffer owned by a single formatting call.
///
/// Line breaks made through [`Output::newline`] are layout breaks; newlines that
/// arrive inside token text (string literals, block comments) stay inside their line
/// so that indenting or collapsing a fragment never rewrites literal content.
#[derive(Debug)]
pub(crate) struct Output {
    lines: Vec<String>,
    real_length: usize,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            lines: vec![String::new()],
            real_length: 0,
        }
    }

    fn current(&self) -> &str {
        self.lines.last().map(String::as_str).unwrap_or("")
    }

    fn current_mut(&mut self) -> &mut String {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.real_length += text.chars().filter(|c| !c.is_whitespace()).count();
        self.current_mut().push_str(text);
    }

    pub(crate) fn indent(&mut self, width: usize) {
        let line = self.current_mut();
        line.extend(std::iter::repeat_n(' ', width));
    }

    pub(crate) fn newline(&mut self) {
        let line = self.current_mut();
        let kept = line.trim_end_matches(' ').len();
        line.truncate(kept);
        self.lines.push(String::new());
    }

    /// Drops the indentation of a line that has no content yet.
    pub(crate) fn clear_line(&mut self) {
        if self.is_line_start() {
            self.current_mut().clear();
        }
    }

    /// True while the current line holds nothing but indentation.
    pub(crate) fn is_line_start(&self) -> bool {
        self.current().trim().is_empty()
    }

    pub(crate) fn column(&self) -> usize {
        let line = self.current();
        line.rsplit('\n').next().unwrap_or(line).chars().count()
    }

    /// Count of non-whitespace characters written so far.
    pub(crate) fn real_length(&self) -> usize {
        self.real_length
    }

    /// Appends `lines`, continuing the current line with the first one and
    /// starting every following one at `column`.
    pub(crate) fn push_lines(&mut self, lines: &[String], column: usize) {
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.newline();
                self.indent(column);
            }
            self.push_str(line);
        }
    }

    pub(crate) fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// The result of a nested formatting call, laid out relative to column 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fragment {
    pub(crate) lines: Vec<String>,
    pub(crate) real_length: usize,
    pub(crate) has_line_comment: bool,
}

impl Fragment {
    /// Joins all layout lines with single spaces.
    pub(crate) fn collapsed(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
