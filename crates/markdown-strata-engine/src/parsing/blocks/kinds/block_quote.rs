use crate::node::{Document, NodeId, NodeValue};
use crate::parsing::blocks::{
    BlockContinue, BlockParser, BlockStart, BlockStartFactory, BlockState, MatchedBlock,
};
use crate::parsing::scan::CODE_BLOCK_INDENT;

pub struct BlockQuote;

impl BlockQuote {
    pub const MARKER: u8 = b'>';

    /// True if the line has a `>` marker at its next non-space position.
    pub fn has_marker(state: &BlockState<'_>) -> bool {
        state.indent() < CODE_BLOCK_INDENT
            && state.line().as_bytes().get(state.next_non_space_index()) == Some(&Self::MARKER)
    }

    /// Column after the marker and its optional following space or tab.
    fn content_column(state: &BlockState<'_>) -> usize {
        let column = state.column() + state.indent() + 1;
        match state.line().as_bytes().get(state.next_non_space_index() + 1) {
            Some(b' ' | b'\t') => column + 1,
            _ => column,
        }
    }
}

#[derive(Debug, Default)]
pub struct BlockQuoteParser;

impl BlockParser for BlockQuoteParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::BlockQuote
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&mut self, _child: &NodeValue, _doc: &mut Document, _node: NodeId) -> bool {
        true
    }

    fn try_continue(&mut self, state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        BlockQuote::has_marker(state).then(|| BlockContinue::AtColumn(BlockQuote::content_column(state)))
    }
}

pub struct BlockQuoteStart;

impl BlockStartFactory for BlockQuoteStart {
    fn name(&self) -> &'static str {
        "block_quote"
    }

    fn try_start(&self, state: &BlockState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        BlockQuote::has_marker(state)
            .then(|| BlockStart::single(BlockQuoteParser).at_column(BlockQuote::content_column(state)))
    }
}
