use crate::node::{CodeBlock, Document, NodeId, NodeValue};
use crate::parsing::blocks::{
    BlockContinue, BlockParser, BlockStart, BlockStartFactory, BlockState, MatchedBlock,
};
use crate::parsing::scan::CODE_BLOCK_INDENT;
use crate::parsing::text::has_non_space;

#[derive(Debug, Default)]
pub struct IndentedCodeParser {
    lines: Vec<String>,
}

impl BlockParser for IndentedCodeParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::CodeBlock(CodeBlock::default())
    }

    fn try_continue(&mut self, state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        if state.indent() >= CODE_BLOCK_INDENT {
            Some(BlockContinue::AtColumn(state.column() + CODE_BLOCK_INDENT))
        } else if state.is_blank() {
            Some(BlockContinue::AtIndex(state.next_non_space_index()))
        } else {
            None
        }
    }

    fn add_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn close_block(&mut self, doc: &mut Document, node: NodeId) {
        let keep = self
            .lines
            .iter()
            .rposition(|line| has_non_space(line))
            .map_or(0, |last| last + 1);
        let mut literal = String::new();
        for line in &self.lines[..keep] {
            literal.push_str(line);
            literal.push('\n');
        }
        if let NodeValue::CodeBlock(block) = doc.value_mut(node) {
            block.literal = literal;
        }
    }
}

pub struct IndentedCodeStart;

impl BlockStartFactory for IndentedCodeStart {
    fn name(&self) -> &'static str {
        "indented_code"
    }

    fn try_start(&self, state: &BlockState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        // cannot interrupt a paragraph
        if state.indent() < CODE_BLOCK_INDENT
            || state.is_blank()
            || matches!(state.active_block(), NodeValue::Paragraph)
        {
            return None;
        }
        Some(
            BlockStart::single(IndentedCodeParser::default())
                .at_column(state.column() + CODE_BLOCK_INDENT),
        )
    }
}
