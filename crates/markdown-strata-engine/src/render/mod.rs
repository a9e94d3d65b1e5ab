//! # Rendering
//!
//! Walks a parsed [`Document`](crate::node::Document) into output text.
//!
//! ## Modules
//!
//! - **`html`**: `HtmlRenderer` producing CommonMark reference HTML, with
//!   per-node renderers and attribute providers for extension nodes
//! - **`markdown`**: `MarkdownRenderer` producing canonical Markdown that
//!   parses back to the same tree
//!
//! ## Key Invariants
//!
//! - Renderers never mutate the document
//! - Custom nodes without a registered handler render only their children

pub mod html;
pub mod markdown;

pub use html::{AttributeProvider, Attributes, HtmlContext, HtmlNodeRenderer, HtmlRenderer, HtmlRendererBuilder};
pub use markdown::MarkdownRenderer;
