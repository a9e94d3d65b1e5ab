//! # markdown-strata extensions
//!
//! Optional syntax on top of the CommonMark core. Every extension implements
//! [`Extension`] and contributes to both the parser and the HTML renderer, so
//! the same list should be handed to [`ParserBuilder::extensions`] and
//! [`HtmlRendererBuilder::extensions`].
//!
//! ## Modules
//!
//! - **`autolink`**: bare URLs, `www.` hosts and e-mail addresses become links
//! - **`strikethrough`**: `~text~` and `~~text~~` as `<del>`
//! - **`ins`**: `++text++` as `<ins>`
//! - **`task_list`**: `[ ]` / `[x]` at the start of a list item
//! - **`front_matter`**: YAML metadata block at the top of a document
//! - **`tables`**: GFM pipe tables
//! - **`image_attributes`**: `{width=.. height=..}` after an image
//!
//! [`ParserBuilder::extensions`]: markdown_strata_engine::ParserBuilder::extensions
//! [`HtmlRendererBuilder::extensions`]: markdown_strata_engine::HtmlRendererBuilder::extensions

pub mod autolink;
pub mod front_matter;
pub mod image_attributes;
pub mod ins;
pub mod strikethrough;
pub mod tables;
pub mod task_list;

use std::sync::Arc;

use markdown_strata_engine::Extension;

pub use autolink::AutolinkExtension;
pub use front_matter::{YamlFrontMatterExtension, front_matter};
pub use image_attributes::ImageAttributesExtension;
pub use ins::InsExtension;
pub use strikethrough::StrikethroughExtension;
pub use tables::TablesExtension;
pub use task_list::TaskListItemsExtension;

/// Names accepted by [`by_name`], in the order [`all`] returns them.
pub const NAMES: [&str; 7] = [
    "autolink",
    "image_attributes",
    "ins",
    "strikethrough",
    "tables",
    "task_list",
    "front_matter",
];

/// Looks up an extension by its [`Extension::name`].
pub fn by_name(name: &str) -> Option<Arc<dyn Extension>> {
    let extension: Arc<dyn Extension> = match name {
        "autolink" => Arc::new(AutolinkExtension),
        "image_attributes" => Arc::new(ImageAttributesExtension),
        "ins" => Arc::new(InsExtension),
        "strikethrough" => Arc::new(StrikethroughExtension::default()),
        "tables" => Arc::new(TablesExtension),
        "task_list" => Arc::new(TaskListItemsExtension),
        "front_matter" => Arc::new(YamlFrontMatterExtension),
        _ => return None,
    };
    Some(extension)
}

/// Every extension with its default settings.
pub fn all() -> Vec<Arc<dyn Extension>> {
    NAMES.iter().filter_map(|name| by_name(name)).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use markdown_strata_engine::{Extension, HtmlRenderer, Parser};

    /// Parses and renders `input` with only `extension` enabled.
    pub fn render_with(extension: impl Extension + 'static, input: &str) -> String {
        let extensions: Vec<Arc<dyn Extension>> = vec![Arc::new(extension)];
        let parser = Parser::builder().extensions(&extensions).build().unwrap();
        let doc = parser.parse(input).unwrap();
        markdown_strata_engine::parsing::snapshot::invariants(&doc);
        HtmlRenderer::builder().extensions(&extensions).build().render(&doc)
    }
}
