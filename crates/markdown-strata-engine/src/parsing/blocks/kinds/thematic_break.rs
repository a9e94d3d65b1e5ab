use crate::node::{NodeId, NodeValue};
use crate::parsing::blocks::{
    BlockContinue, BlockParser, BlockStart, BlockStartFactory, BlockState, MatchedBlock,
};
use crate::parsing::scan::CODE_BLOCK_INDENT;

pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKERS: [char; 3] = ['-', '_', '*'];

    /// Three or more of the same marker, optionally separated by spaces or tabs.
    pub fn matches(rest: &str) -> bool {
        let mut marker = None;
        let mut count = 0;
        for c in rest.chars() {
            match c {
                ' ' | '\t' => {}
                c if Self::MARKERS.contains(&c) && marker.is_none_or(|m| m == c) => {
                    marker = Some(c);
                    count += 1;
                }
                _ => return false,
            }
        }
        count >= 3
    }
}

#[derive(Debug, Default)]
pub struct ThematicBreakParser;

impl BlockParser for ThematicBreakParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::ThematicBreak
    }

    fn try_continue(&mut self, _state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        None
    }
}

pub struct ThematicBreakStart;

impl BlockStartFactory for ThematicBreakStart {
    fn name(&self) -> &'static str {
        "thematic_break"
    }

    fn try_start(&self, state: &BlockState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        if state.indent() >= CODE_BLOCK_INDENT || !ThematicBreak::matches(state.rest()) {
            return None;
        }
        Some(BlockStart::single(ThematicBreakParser).at_index(state.line().len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("***", true)]
    #[case("- - -", true)]
    #[case("_____________________________________", true)]
    #[case(" **  * ** * ** * **", true)]
    #[case("--", false)]
    #[case("*-*", false)]
    #[case("_ _ _ _ a", false)]
    #[case("+++", false)]
    fn recognizes_breaks(#[case] rest: &str, #[case] expected: bool) {
        assert_eq!(ThematicBreak::matches(rest), expected);
    }
}
