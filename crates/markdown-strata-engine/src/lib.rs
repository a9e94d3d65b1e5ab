pub mod error;
pub mod node;
pub mod parsing;
pub mod render;

// Re-export key types for easier usage
pub use error::{BuildError, ContractViolation, ParseError, ResourceExhausted};
pub use node::{CustomNode, Document, Fragment, NodeId, NodeKind, NodeValue, Visitor, walk};
pub use parsing::blocks::{BlockParser, BlockStart, BlockStartFactory, BlockType};
pub use parsing::inline::{Cursor, DelimiterProcessor, DelimiterRun, InlineContentParser};
pub use parsing::references::{LinkReference, ReferenceMap};
pub use parsing::registry::{Extension, Placement, PostProcessor};
pub use parsing::{Parser, ParserBuilder};
pub use render::{HtmlRenderer, HtmlRendererBuilder, MarkdownRenderer};

/// Parses CommonMark and renders it with the default HTML options.
pub fn markdown_to_html(input: &str) -> Result<String, ParseError> {
    let doc = Parser::commonmark().parse(input)?;
    Ok(HtmlRenderer::default().render(&doc))
}
