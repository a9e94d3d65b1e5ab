use super::LinkReference;
use crate::parsing::inline::cursor::Cursor;
use crate::parsing::inline::link::{
    MAX_LABEL_LENGTH, scan_destination, scan_label_content, scan_title_content,
};
use crate::parsing::source::InlineSource;
use crate::parsing::text::{normalize_label, unescape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefinitionState {
    #[default]
    StartDefinition,
    Label,
    Destination,
    StartTitle,
    Title,
    /// No further definitions are possible; everything is paragraph text.
    Paragraph,
}

/// Extracts link reference definitions from the leading lines of a paragraph.
///
/// Lines are fed one at a time as the paragraph grows. A definition may span
/// lines (label, destination and title can each start on a new line). Lines
/// that end up not being part of a definition are kept as paragraph lines.
#[derive(Debug, Default)]
pub struct DefinitionParser {
    state: DefinitionState,
    paragraph: InlineSource,
    definitions: Vec<LinkReference>,
    label: String,
    normalized_label: String,
    destination: String,
    title_end: u8,
    title_buffer: String,
    title: Option<String>,
    reference_valid: bool,
}

impl DefinitionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, line: &str) {
        self.paragraph.push_line(line);
        if self.state == DefinitionState::Paragraph {
            return;
        }

        let mut cur = Cursor::new(line);
        while !cur.eof() {
            let ok = match self.state {
                DefinitionState::StartDefinition => self.start_definition(&mut cur),
                DefinitionState::Label => self.label(&mut cur),
                DefinitionState::Destination => self.destination(&mut cur),
                DefinitionState::StartTitle => self.start_title(&mut cur),
                DefinitionState::Title => self.title(&mut cur),
                DefinitionState::Paragraph => return,
            };
            if !ok {
                self.state = DefinitionState::Paragraph;
                // a valid destination without a valid title still counts
                self.finish_reference();
                return;
            }
        }
    }

    pub fn state(&self) -> DefinitionState {
        self.state
    }

    /// Lines not consumed by a definition.
    pub fn paragraph_lines(&self) -> &[String] {
        self.paragraph.lines()
    }

    /// Lines that turned out not to be definitions.
    pub fn paragraph(&self) -> &InlineSource {
        &self.paragraph
    }

    /// Completed definitions, in source order. Drains them.
    pub fn take_definitions(&mut self) -> Vec<LinkReference> {
        self.finish_reference();
        std::mem::take(&mut self.definitions)
    }

    fn start_definition(&mut self, cur: &mut Cursor<'_>) -> bool {
        self.finish_reference();

        cur.whitespace();
        if !cur.next_if(b'[') {
            return false;
        }
        self.state = DefinitionState::Label;
        self.label.clear();
        if cur.eof() {
            self.label.push('\n');
        }
        true
    }

    fn label(&mut self, cur: &mut Cursor<'_>) -> bool {
        let start = cur.pos();
        if !scan_label_content(cur) {
            return false;
        }
        self.label.push_str(cur.slice(start, cur.pos()));

        if cur.eof() {
            // label continues on the next line
            self.label.push('\n');
            return true;
        }
        if !cur.next_if(b']') || !cur.next_if(b':') {
            return false;
        }
        if self.label.chars().count() > MAX_LABEL_LENGTH {
            return false;
        }
        let normalized = normalize_label(&self.label);
        if normalized.is_empty() {
            return false;
        }
        self.normalized_label = normalized;
        self.state = DefinitionState::Destination;
        cur.whitespace();
        true
    }

    fn destination(&mut self, cur: &mut Cursor<'_>) -> bool {
        cur.whitespace();
        let start = cur.pos();
        if !scan_destination(cur) {
            return false;
        }
        let raw = cur.slice(start, cur.pos());
        self.destination = match raw.strip_prefix('<') {
            Some(inner) => inner[..inner.len() - 1].to_string(),
            None => raw.to_string(),
        };

        let whitespace = cur.whitespace();
        if cur.eof() {
            // definition is complete even if no title follows
            self.reference_valid = true;
            self.paragraph.clear();
        } else if whitespace == 0 {
            return false;
        }
        self.state = DefinitionState::StartTitle;
        true
    }

    fn start_title(&mut self, cur: &mut Cursor<'_>) -> bool {
        cur.whitespace();
        if cur.eof() {
            self.state = DefinitionState::StartDefinition;
            return true;
        }

        let end = match cur.peek() {
            Some(b'"') => Some(b'"'),
            Some(b'\'') => Some(b'\''),
            Some(b'(') => Some(b')'),
            _ => None,
        };
        match end {
            Some(end) => {
                self.state = DefinitionState::Title;
                self.title_end = end;
                self.title_buffer.clear();
                cur.bump();
                if cur.eof() {
                    self.title_buffer.push('\n');
                }
            }
            // maybe another definition starts here instead
            None => self.state = DefinitionState::StartDefinition,
        }
        true
    }

    fn title(&mut self, cur: &mut Cursor<'_>) -> bool {
        let start = cur.pos();
        if !scan_title_content(cur, self.title_end) {
            return false;
        }
        self.title_buffer.push_str(cur.slice(start, cur.pos()));

        if cur.eof() {
            self.title_buffer.push('\n');
            return true;
        }

        cur.bump();
        cur.whitespace();
        if !cur.eof() {
            // trailing text after the title
            return false;
        }
        self.title = Some(std::mem::take(&mut self.title_buffer));
        self.reference_valid = true;
        self.paragraph.clear();
        self.state = DefinitionState::StartDefinition;
        true
    }

    fn finish_reference(&mut self) {
        if !self.reference_valid {
            return;
        }
        let destination = unescape(&self.destination).into_owned();
        let title = self.title.take().map(|t| unescape(&t).into_owned());
        self.definitions.push(LinkReference {
            label: std::mem::take(&mut self.normalized_label),
            destination,
            title,
        });
        self.label.clear();
        self.destination.clear();
        self.title_buffer.clear();
        self.reference_valid = false;
    }
}
