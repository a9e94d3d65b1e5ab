use crate::error::ParseError;
use crate::node::{Document, NodeId, NodeValue};
use crate::parsing::blocks::{BlockContinue, BlockParser, BlockState};
use crate::parsing::inline::InlineParser;
use crate::parsing::references::{DefinitionParser, LinkReference};

/// Paragraph text, with link reference definitions peeled off the front.
#[derive(Debug, Default)]
pub struct ParagraphParser {
    definitions: DefinitionParser,
}

impl ParagraphParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paragraph content lines joined for inline parsing.
    pub fn content(&self) -> String {
        self.definitions.paragraph().content()
    }
}

impl BlockParser for ParagraphParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::Paragraph
    }

    fn can_have_lazy_continuation_lines(&self) -> bool {
        true
    }

    fn try_continue(&mut self, state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        if state.is_blank() {
            None
        } else {
            Some(BlockContinue::AtIndex(state.index()))
        }
    }

    fn add_line(&mut self, line: &str) {
        self.definitions.parse(line);
    }

    fn close_block(&mut self, doc: &mut Document, node: NodeId) {
        // only definitions: no paragraph left
        if self.definitions.paragraph().is_empty() {
            doc.detach(node);
        }
    }

    fn take_definitions(&mut self) -> Vec<LinkReference> {
        self.definitions.take_definitions()
    }

    fn paragraph_lines(&self) -> Option<&[String]> {
        Some(self.definitions.paragraph_lines())
    }

    fn parse_inlines(
        &mut self,
        node: NodeId,
        doc: &mut Document,
        inlines: &mut InlineParser<'_>,
    ) -> Result<(), ParseError> {
        if doc.parent(node).is_none() {
            return Ok(());
        }
        inlines.parse(&self.content(), node, doc)
    }
}
