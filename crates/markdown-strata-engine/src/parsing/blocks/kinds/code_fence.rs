use crate::node::{CodeBlock, Document, Fence, FenceKind, NodeId, NodeValue};
use crate::parsing::blocks::{
    BlockContinue, BlockParser, BlockStart, BlockStartFactory, BlockState, MatchedBlock,
};
use crate::parsing::scan::CODE_BLOCK_INDENT;
use crate::parsing::text::{is_space_or_tab, unescape};

pub struct CodeFence;

impl CodeFence {
    pub const MIN_LENGTH: usize = 3;

    /// Detects an opening fence, returning its kind and length.
    pub fn opener(rest: &str) -> Option<(FenceKind, usize)> {
        let c = rest.chars().next()?;
        let kind = FenceKind::from_char(c)?;
        let length = rest.chars().take_while(|&x| x == c).count();
        if length < Self::MIN_LENGTH {
            return None;
        }
        // backtick fences cannot have backticks in the info string
        if kind == FenceKind::Backticks && rest[length..].contains('`') {
            return None;
        }
        Some((kind, length))
    }

    /// True if `rest` closes a fence of `kind` opened with `length` markers.
    pub fn closes(kind: FenceKind, length: usize, rest: &str) -> bool {
        let c = kind.as_char();
        let run = rest.chars().take_while(|&x| x == c).count();
        run >= length && rest[run..].chars().all(is_space_or_tab)
    }
}

#[derive(Debug)]
pub struct FencedCodeParser {
    fence: Fence,
    info: Option<String>,
    literal: String,
}

impl FencedCodeParser {
    pub fn new(fence: Fence) -> Self {
        Self {
            fence,
            info: None,
            literal: String::new(),
        }
    }
}

impl BlockParser for FencedCodeParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::CodeBlock(CodeBlock {
            fence: Some(self.fence),
            ..CodeBlock::default()
        })
    }

    fn try_continue(&mut self, state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        if state.indent() < CODE_BLOCK_INDENT
            && CodeFence::closes(self.fence.kind, self.fence.length, state.rest())
        {
            return Some(BlockContinue::Finished);
        }

        // content lines lose up to the opening fence's indentation
        let line = state.line().as_bytes();
        let mut index = state.index();
        let mut remaining = self.fence.indent;
        while remaining > 0 && line.get(index) == Some(&b' ') {
            index += 1;
            remaining -= 1;
        }
        Some(BlockContinue::AtIndex(index))
    }

    fn add_line(&mut self, line: &str) {
        match self.info {
            None => self.info = Some(line.to_string()),
            Some(_) => {
                self.literal.push_str(line);
                self.literal.push('\n');
            }
        }
    }

    fn close_block(&mut self, doc: &mut Document, node: NodeId) {
        let info = self.info.as_deref().map(|i| unescape(i.trim()).into_owned());
        if let NodeValue::CodeBlock(block) = doc.value_mut(node) {
            block.info = info.unwrap_or_default();
            block.literal = std::mem::take(&mut self.literal);
        }
    }
}

pub struct FencedCodeStart;

impl BlockStartFactory for FencedCodeStart {
    fn name(&self) -> &'static str {
        "fenced_code"
    }

    fn try_start(&self, state: &BlockState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        if state.indent() >= CODE_BLOCK_INDENT {
            return None;
        }
        let (kind, length) = CodeFence::opener(state.rest())?;
        let fence = Fence {
            kind,
            length,
            indent: state.indent(),
        };
        Some(
            BlockStart::single(FencedCodeParser::new(fence))
                .at_index(state.next_non_space_index() + length),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("```", Some((FenceKind::Backticks, 3)))]
    #[case("~~~~ rust", Some((FenceKind::Tildes, 4)))]
    #[case("``` aa ```", None)]
    #[case("~~~ aa ``` ~~~", Some((FenceKind::Tildes, 3)))]
    #[case("``", None)]
    fn openers(#[case] rest: &str, #[case] expected: Option<(FenceKind, usize)>) {
        assert_eq!(CodeFence::opener(rest), expected);
    }

    #[test]
    fn closing_fence_must_be_long_enough() {
        assert!(CodeFence::closes(FenceKind::Backticks, 3, "````  "));
        assert!(!CodeFence::closes(FenceKind::Backticks, 4, "```"));
        assert!(!CodeFence::closes(FenceKind::Tildes, 3, "```"));
        assert!(!CodeFence::closes(FenceKind::Backticks, 3, "``` aaa"));
    }
}
