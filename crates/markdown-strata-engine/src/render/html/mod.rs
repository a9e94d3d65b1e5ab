//! HTML output matching the CommonMark reference renderer.

pub mod urls;
pub mod writer;

use std::collections::HashMap;
use std::sync::Arc;

use crate::node::{CodeBlock, Document, Link, ListKind, NodeId, NodeValue};
use crate::parsing::registry::Extension;

pub use writer::HtmlWriter;

/// Attribute list of one tag, in output order.
pub type Attributes = Vec<(String, String)>;

/// Renders one kind of custom node, selected by [`CustomNode::name`](crate::node::CustomNode::name).
pub trait HtmlNodeRenderer: Send + Sync {
    fn node_name(&self) -> &'static str;

    fn render(&self, ctx: &mut HtmlContext<'_>, node: NodeId);
}

/// Adds attributes to tags rendered for core nodes.
///
/// Providers run in registration order after the core attributes are set.
pub trait AttributeProvider: Send + Sync {
    fn set_attributes(&self, doc: &Document, node: NodeId, tag: &str, attributes: &mut Attributes);
}

#[derive(Clone)]
pub struct HtmlRenderer {
    softbreak: String,
    escape_html: bool,
    sanitize_urls: bool,
    percent_encode_urls: bool,
    node_renderers: HashMap<&'static str, Arc<dyn HtmlNodeRenderer>>,
    attribute_providers: Vec<Arc<dyn AttributeProvider>>,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        HtmlRendererBuilder::new().build()
    }
}

impl HtmlRenderer {
    pub fn builder() -> HtmlRendererBuilder {
        HtmlRendererBuilder::new()
    }

    pub fn render(&self, doc: &Document) -> String {
        let mut ctx = HtmlContext {
            renderer: self,
            doc,
            writer: HtmlWriter::new(),
        };
        ctx.render(doc.root());
        ctx.writer.into_string()
    }
}

impl std::fmt::Debug for HtmlRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut nodes: Vec<_> = self.node_renderers.keys().collect();
        nodes.sort();
        f.debug_struct("HtmlRenderer")
            .field("softbreak", &self.softbreak)
            .field("escape_html", &self.escape_html)
            .field("sanitize_urls", &self.sanitize_urls)
            .field("percent_encode_urls", &self.percent_encode_urls)
            .field("node_renderers", &nodes)
            .finish()
    }
}

pub struct HtmlRendererBuilder {
    softbreak: String,
    escape_html: bool,
    sanitize_urls: bool,
    percent_encode_urls: bool,
    node_renderers: HashMap<&'static str, Arc<dyn HtmlNodeRenderer>>,
    attribute_providers: Vec<Arc<dyn AttributeProvider>>,
}

impl Default for HtmlRendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRendererBuilder {
    pub fn new() -> Self {
        Self {
            softbreak: "\n".to_string(),
            escape_html: false,
            sanitize_urls: false,
            percent_encode_urls: true,
            node_renderers: HashMap::new(),
            attribute_providers: Vec::new(),
        }
    }

    /// Output for a soft line break, `"\n"` by default. `"<br />"` turns
    /// every soft break into a hard one.
    pub fn softbreak(&mut self, softbreak: impl Into<String>) -> &mut Self {
        self.softbreak = softbreak.into();
        self
    }

    /// Escape raw HTML blocks and inline HTML instead of passing them through.
    pub fn escape_html(&mut self, escape: bool) -> &mut Self {
        self.escape_html = escape;
        self
    }

    /// Blank out unsafe link and image destinations and mark links
    /// `rel="nofollow"`.
    pub fn sanitize_urls(&mut self, sanitize: bool) -> &mut Self {
        self.sanitize_urls = sanitize;
        self
    }

    pub fn percent_encode_urls(&mut self, encode: bool) -> &mut Self {
        self.percent_encode_urls = encode;
        self
    }

    pub fn extensions<'e>(
        &mut self,
        extensions: impl IntoIterator<Item = &'e Arc<dyn Extension>>,
    ) -> &mut Self {
        for extension in extensions {
            extension.extend_html(self);
        }
        self
    }

    /// Registers a renderer for custom nodes named `renderer.node_name()`.
    /// A later registration for the same name replaces the earlier one.
    pub fn node_renderer(&mut self, renderer: impl HtmlNodeRenderer + 'static) -> &mut Self {
        self.node_renderers.insert(renderer.node_name(), Arc::new(renderer));
        self
    }

    pub fn attribute_provider(&mut self, provider: impl AttributeProvider + 'static) -> &mut Self {
        self.attribute_providers.push(Arc::new(provider));
        self
    }

    pub fn build(&self) -> HtmlRenderer {
        HtmlRenderer {
            softbreak: self.softbreak.clone(),
            escape_html: self.escape_html,
            sanitize_urls: self.sanitize_urls,
            percent_encode_urls: self.percent_encode_urls,
            node_renderers: self.node_renderers.clone(),
            attribute_providers: self.attribute_providers.clone(),
        }
    }
}

/// State of one render, handed to [`HtmlNodeRenderer`]s.
pub struct HtmlContext<'r> {
    renderer: &'r HtmlRenderer,
    doc: &'r Document,
    writer: HtmlWriter,
}

impl<'r> HtmlContext<'r> {
    pub fn document(&self) -> &'r Document {
        self.doc
    }

    pub fn writer(&mut self) -> &mut HtmlWriter {
        &mut self.writer
    }

    /// Applies the registered attribute providers to `attributes`.
    pub fn extend_attributes(&self, node: NodeId, tag: &str, mut attributes: Attributes) -> Attributes {
        for provider in &self.renderer.attribute_providers {
            provider.set_attributes(self.doc, node, tag, &mut attributes);
        }
        attributes
    }

    /// Destination as it should appear in `href` or `src`.
    pub fn encode_url(&self, url: &str) -> String {
        let url = if self.renderer.sanitize_urls {
            urls::sanitize(url)
        } else {
            url
        };
        if self.renderer.percent_encode_urls {
            urls::percent_encode(url)
        } else {
            url.to_string()
        }
    }

    pub fn render_children(&mut self, node: NodeId) {
        let doc = self.doc;
        for child in doc.children(node) {
            self.render(child);
        }
    }

    pub fn render(&mut self, node: NodeId) {
        let doc = self.doc;
        match doc.value(node) {
            NodeValue::Document => self.render_children(node),
            NodeValue::BlockQuote => {
                self.writer.line();
                self.open_tag(node, "blockquote");
                self.writer.line();
                self.render_children(node);
                self.writer.line();
                self.writer.close_tag("blockquote");
                self.writer.line();
            }
            NodeValue::List(list) => {
                let (tag, start) = match list.kind {
                    ListKind::Bullet { .. } => ("ul", None),
                    ListKind::Ordered { start, .. } => ("ol", (start != 1).then_some(start)),
                };
                let mut attributes = Attributes::new();
                if let Some(start) = start {
                    attributes.push(("start".to_string(), start.to_string()));
                }
                let attributes = self.extend_attributes(node, tag, attributes);
                self.writer.line();
                self.writer.tag(tag, &attributes);
                self.writer.line();
                self.render_children(node);
                self.writer.line();
                self.writer.close_tag(tag);
                self.writer.line();
            }
            NodeValue::Item(_) => {
                self.open_tag(node, "li");
                self.render_children(node);
                self.writer.close_tag("li");
                self.writer.line();
            }
            NodeValue::CodeBlock(code) => self.render_code_block(node, code),
            NodeValue::HtmlBlock(literal) => {
                self.writer.line();
                if self.renderer.escape_html {
                    self.writer.tag("p", &Attributes::new());
                    self.writer.text(literal);
                    self.writer.close_tag("p");
                } else {
                    self.writer.raw(literal);
                }
                self.writer.line();
            }
            NodeValue::Paragraph => {
                if self.in_tight_list(node) {
                    self.render_children(node);
                } else {
                    self.writer.line();
                    self.open_tag(node, "p");
                    self.render_children(node);
                    self.writer.close_tag("p");
                    self.writer.line();
                }
            }
            NodeValue::Heading(heading) => {
                let tag = format!("h{}", heading.level);
                self.writer.line();
                self.open_tag(node, &tag);
                self.render_children(node);
                self.writer.close_tag(&tag);
                self.writer.line();
            }
            NodeValue::ThematicBreak => {
                self.writer.line();
                let attributes = self.extend_attributes(node, "hr", Attributes::new());
                self.writer.void_tag("hr", &attributes);
                self.writer.line();
            }
            NodeValue::Text(literal) => self.writer.text(literal),
            NodeValue::SoftBreak => {
                let softbreak = &self.renderer.softbreak;
                self.writer.raw(softbreak);
            }
            NodeValue::HardBreak => {
                let attributes = self.extend_attributes(node, "br", Attributes::new());
                self.writer.void_tag("br", &attributes);
                self.writer.raw("\n");
            }
            NodeValue::Code(literal) => {
                self.open_tag(node, "code");
                self.writer.text(literal);
                self.writer.close_tag("code");
            }
            NodeValue::HtmlInline(literal) => {
                if self.renderer.escape_html {
                    self.writer.text(literal);
                } else {
                    self.writer.raw(literal);
                }
            }
            NodeValue::Emphasis(_) => {
                self.open_tag(node, "em");
                self.render_children(node);
                self.writer.close_tag("em");
            }
            NodeValue::Strong(_) => {
                self.open_tag(node, "strong");
                self.render_children(node);
                self.writer.close_tag("strong");
            }
            NodeValue::Link(link) => self.render_link(node, link),
            NodeValue::Image(link) => self.render_image(node, link),
            NodeValue::Custom(custom) => match self.renderer.node_renderers.get(custom.name()) {
                Some(renderer) => {
                    let renderer = Arc::clone(renderer);
                    renderer.render(self, node);
                }
                None => self.render_children(node),
            },
        }
    }

    /// Opening tag with only provider attributes.
    fn open_tag(&mut self, node: NodeId, tag: &str) {
        let attributes = self.extend_attributes(node, tag, Attributes::new());
        self.writer.tag(tag, &attributes);
    }

    fn in_tight_list(&self, paragraph: NodeId) -> bool {
        let doc = self.doc;
        doc.parent(paragraph)
            .filter(|item| matches!(doc.value(*item), NodeValue::Item(_)))
            .and_then(|item| doc.parent(item))
            .is_some_and(|list| matches!(doc.value(list), NodeValue::List(data) if data.tight))
    }

    fn render_code_block(&mut self, node: NodeId, code: &CodeBlock) {
        let mut attributes = Attributes::new();
        if let Some(language) = code.info.split_whitespace().next() {
            attributes.push(("class".to_string(), format!("language-{language}")));
        }
        let attributes = self.extend_attributes(node, "code", attributes);
        self.writer.line();
        self.writer.tag("pre", &Attributes::new());
        self.writer.tag("code", &attributes);
        self.writer.text(&code.literal);
        self.writer.close_tag("code");
        self.writer.close_tag("pre");
        self.writer.line();
    }

    fn render_link(&mut self, node: NodeId, link: &Link) {
        let mut attributes = vec![("href".to_string(), self.encode_url(&link.destination))];
        if let Some(title) = &link.title {
            attributes.push(("title".to_string(), title.clone()));
        }
        if self.renderer.sanitize_urls {
            attributes.push(("rel".to_string(), "nofollow".to_string()));
        }
        let attributes = self.extend_attributes(node, "a", attributes);
        self.writer.tag("a", &attributes);
        self.render_children(node);
        self.writer.close_tag("a");
    }

    fn render_image(&mut self, node: NodeId, link: &Link) {
        let mut attributes = vec![
            ("src".to_string(), self.encode_url(&link.destination)),
            ("alt".to_string(), alt_text(self.doc, node)),
        ];
        if let Some(title) = &link.title {
            attributes.push(("title".to_string(), title.clone()));
        }
        let attributes = self.extend_attributes(node, "img", attributes);
        self.writer.void_tag("img", &attributes);
    }
}

/// Plain text of an image description: literals and line breaks only.
fn alt_text(doc: &Document, image: NodeId) -> String {
    let mut out = String::new();
    for node in doc.descendants(image).skip(1) {
        match doc.value(node) {
            NodeValue::Text(s) | NodeValue::Code(s) => out.push_str(s),
            NodeValue::SoftBreak | NodeValue::HardBreak => out.push('\n'),
            _ => {}
        }
    }
    out
}
