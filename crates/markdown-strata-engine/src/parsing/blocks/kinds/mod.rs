//! Core block types. Each module owns its marker constants, its
//! `BlockParser` and the `BlockStartFactory` that opens it.

pub mod block_quote;
pub mod code_fence;
pub mod document;
pub mod heading;
pub mod html_block;
pub mod indented_code;
pub mod list;
pub mod paragraph;
pub mod thematic_break;

use std::sync::Arc;

use super::BlockStartFactory;

pub use block_quote::{BlockQuote, BlockQuoteStart};
pub use code_fence::{CodeFence, FencedCodeStart};
pub use document::DocumentParser;
pub use heading::{AtxHeading, HeadingStart};
pub use html_block::HtmlBlockStart;
pub use indented_code::IndentedCodeStart;
pub use list::{ListMarker, ListStart};
pub use paragraph::ParagraphParser;
pub use thematic_break::{ThematicBreak, ThematicBreakStart};

/// Core block starts in priority order.
///
/// Setext headings are detected by the heading matcher, so it must come before
/// thematic breaks: `---` under a paragraph is an underline, not a rule.
pub fn core_block_starts() -> Vec<Arc<dyn BlockStartFactory>> {
    vec![
        Arc::new(BlockQuoteStart),
        Arc::new(HeadingStart),
        Arc::new(FencedCodeStart),
        Arc::new(HtmlBlockStart),
        Arc::new(ThematicBreakStart),
        Arc::new(ListStart),
        Arc::new(IndentedCodeStart),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::BlockType;

    #[test]
    fn core_starts_match_block_type_names() {
        let names: Vec<_> = core_block_starts().iter().map(|f| f.name()).collect();
        let expected: Vec<_> = BlockType::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, expected);
    }
}
