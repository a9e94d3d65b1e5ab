use crate::node::{Document, NodeId, NodeValue};
use crate::parsing::blocks::{BlockContinue, BlockParser, BlockState};

/// Root frame. Accepts every block and every line.
#[derive(Debug, Default)]
pub struct DocumentParser;

impl BlockParser for DocumentParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::Document
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&mut self, _child: &NodeValue, _doc: &mut Document, _node: NodeId) -> bool {
        true
    }

    fn try_continue(&mut self, state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        Some(BlockContinue::AtIndex(state.index()))
    }
}
