/// Raw inline text a leaf block accumulates during block parsing.
///
/// The text is only handed to the inline engine after every block is closed,
/// so link reference definitions later in the document are already known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineSource {
    lines: Vec<String>,
}

impl InlineSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines joined with `\n`, the form the inline engine consumes.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}

impl From<Vec<String>> for InlineSource {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}
