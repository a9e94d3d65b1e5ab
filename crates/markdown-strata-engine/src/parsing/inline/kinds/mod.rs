//! Core inline syntax: content parsers tried at their trigger characters and
//! the emphasis delimiter processors.

pub mod autolink;
pub mod backslash;
pub mod code_span;
pub mod emphasis;
pub mod entity;
pub mod html_inline;

use std::sync::Arc;

use super::{DelimiterProcessor, InlineContentParser};

pub use autolink::AutolinkParser;
pub use backslash::BackslashParser;
pub use code_span::CodeSpanParser;
pub use emphasis::EmphasisDelimiterProcessor;
pub use entity::EntityParser;
pub use html_inline::HtmlInlineParser;

/// Core content parsers. Both `<` parsers share a trigger; autolinks win.
pub fn core_content_parsers() -> Vec<Arc<dyn InlineContentParser>> {
    vec![
        Arc::new(BackslashParser),
        Arc::new(CodeSpanParser),
        Arc::new(EntityParser),
        Arc::new(AutolinkParser),
        Arc::new(HtmlInlineParser),
    ]
}

pub fn core_delimiter_processors() -> Vec<Arc<dyn DelimiterProcessor>> {
    vec![
        Arc::new(EmphasisDelimiterProcessor::new('*')),
        Arc::new(EmphasisDelimiterProcessor::new('_')),
    ]
}
