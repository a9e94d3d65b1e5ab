use crate::error::ParseError;
use crate::node::{Document, Heading, NodeId, NodeValue};
use crate::parsing::blocks::{
    BlockContinue, BlockParser, BlockStart, BlockStartFactory, BlockState, MatchedBlock,
};
use crate::parsing::inline::InlineParser;
use crate::parsing::scan::CODE_BLOCK_INDENT;
use crate::parsing::text::is_space_or_tab;

pub struct AtxHeading;

impl AtxHeading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: usize = 6;

    /// Parses `# content #`, returning the level and the content with the
    /// optional closing sequence and surrounding whitespace removed.
    pub fn parse(rest: &str) -> Option<(u8, &str)> {
        let level = rest.bytes().take_while(|&b| b == b'#').count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let after = &rest[level..];
        match after.chars().next() {
            None => return Some((level as u8, "")),
            Some(c) if is_space_or_tab(c) => {}
            Some(_) => return None,
        }

        let content = after.trim_start_matches([' ', '\t']);
        let bytes = content.as_bytes();
        let mut end = 0;
        let mut hash_can_end = true;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'#' if hash_can_end => {
                    while i < bytes.len() && bytes[i] == b'#' {
                        i += 1;
                    }
                    let spaces_start = i;
                    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
                        i += 1;
                    }
                    // a closing sequence only counts at the very end
                    if i < bytes.len() {
                        end = i;
                    }
                    hash_can_end = i > spaces_start;
                }
                b' ' | b'\t' => {
                    hash_can_end = true;
                    i += 1;
                }
                _ => {
                    hash_can_end = false;
                    i += 1;
                    end = i;
                }
            }
        }
        Some((level as u8, &content[..end]))
    }
}

pub struct SetextHeading;

impl SetextHeading {
    /// Level for an underline made of `=` (1) or `-` (2).
    pub fn underline_level(rest: &str) -> Option<u8> {
        let marker = rest.chars().next()?;
        let level = match marker {
            '=' => 1,
            '-' => 2,
            _ => return None,
        };
        let underline = rest.trim_start_matches(marker);
        underline
            .chars()
            .all(is_space_or_tab)
            .then_some(level)
    }
}

#[derive(Debug)]
pub struct HeadingParser {
    heading: Heading,
    content: String,
}

impl HeadingParser {
    pub fn new(level: u8, setext: bool, content: String) -> Self {
        Self {
            heading: Heading { level, setext },
            content,
        }
    }
}

impl BlockParser for HeadingParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::Heading(self.heading)
    }

    fn try_continue(&mut self, _state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        // always a single line
        None
    }

    fn parse_inlines(
        &mut self,
        node: NodeId,
        doc: &mut Document,
        inlines: &mut InlineParser<'_>,
    ) -> Result<(), ParseError> {
        inlines.parse(&self.content, node, doc)
    }
}

/// Opens ATX headings and turns a paragraph followed by an underline into a
/// setext heading.
pub struct HeadingStart;

impl BlockStartFactory for HeadingStart {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn try_start(&self, state: &BlockState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        if state.indent() >= CODE_BLOCK_INDENT {
            return None;
        }
        let rest = state.rest();
        let end = state.line().len();

        if let Some((level, content)) = AtxHeading::parse(rest) {
            let parser = HeadingParser::new(level, false, content.to_string());
            return Some(BlockStart::single(parser).at_index(end));
        }

        let level = SetextHeading::underline_level(rest)?;
        let lines = matched.paragraph_lines();
        if lines.is_empty() {
            return None;
        }
        let content = lines.join("\n");
        Some(
            BlockStart::single(HeadingParser::new(level, true, content))
                .at_index(end)
                .replace_active_block(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# foo", Some((1, "foo")))]
    #[case("###### foo", Some((6, "foo")))]
    #[case("####### foo", None)]
    #[case("#5 bolt", None)]
    #[case("#", Some((1, "")))]
    #[case("## foo ##", Some((2, "foo")))]
    #[case("# foo ##################################", Some((1, "foo")))]
    #[case("### foo ###     ", Some((3, "foo")))]
    #[case("### foo ### b", Some((3, "foo ### b")))]
    #[case("# foo#", Some((1, "foo#")))]
    #[case("### foo \\###", Some((3, "foo \\###")))]
    #[case("## ", Some((2, "")))]
    #[case("### ###", Some((3, "")))]
    #[case("#\tfoo", Some((1, "foo")))]
    fn atx_content(#[case] rest: &str, #[case] expected: Option<(u8, &str)>) {
        assert_eq!(AtxHeading::parse(rest), expected);
    }

    #[rstest]
    #[case("===", Some(1))]
    #[case("-", Some(2))]
    #[case("---   ", Some(2))]
    #[case("= =", None)]
    #[case("--- a", None)]
    #[case("***", None)]
    fn setext_underlines(#[case] rest: &str, #[case] expected: Option<u8>) {
        assert_eq!(SetextHeading::underline_level(rest), expected);
    }
}
