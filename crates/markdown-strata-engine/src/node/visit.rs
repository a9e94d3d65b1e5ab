use super::{CodeBlock, CustomNode, Document, Heading, ItemData, Link, ListData, NodeId, NodeValue};

/// Per-variant callbacks for a pre-order walk.
///
/// Every method defaults to visiting the node's children, so implementors only
/// override what they care about. Extension nodes arrive at
/// [`Visitor::visit_custom`], which keeps visitors working on trees that hold
/// node types they have never heard of.
pub trait Visitor {
    fn visit_document(&mut self, doc: &Document, node: NodeId) {
        self.visit_children(doc, node);
    }

    fn visit_block_quote(&mut self, doc: &Document, node: NodeId) {
        self.visit_children(doc, node);
    }

    fn visit_list(&mut self, doc: &Document, node: NodeId, _list: &ListData) {
        self.visit_children(doc, node);
    }

    fn visit_item(&mut self, doc: &Document, node: NodeId, _item: &ItemData) {
        self.visit_children(doc, node);
    }

    fn visit_code_block(&mut self, doc: &Document, node: NodeId, _code: &CodeBlock) {
        self.visit_children(doc, node);
    }

    fn visit_html_block(&mut self, doc: &Document, node: NodeId, _literal: &str) {
        self.visit_children(doc, node);
    }

    fn visit_paragraph(&mut self, doc: &Document, node: NodeId) {
        self.visit_children(doc, node);
    }

    fn visit_heading(&mut self, doc: &Document, node: NodeId, _heading: &Heading) {
        self.visit_children(doc, node);
    }

    fn visit_thematic_break(&mut self, doc: &Document, node: NodeId) {
        self.visit_children(doc, node);
    }

    fn visit_text(&mut self, _doc: &Document, _node: NodeId, _literal: &str) {}

    fn visit_soft_break(&mut self, _doc: &Document, _node: NodeId) {}

    fn visit_hard_break(&mut self, _doc: &Document, _node: NodeId) {}

    fn visit_code(&mut self, _doc: &Document, _node: NodeId, _literal: &str) {}

    fn visit_html_inline(&mut self, _doc: &Document, _node: NodeId, _literal: &str) {}

    fn visit_emphasis(&mut self, doc: &Document, node: NodeId) {
        self.visit_children(doc, node);
    }

    fn visit_strong(&mut self, doc: &Document, node: NodeId) {
        self.visit_children(doc, node);
    }

    fn visit_link(&mut self, doc: &Document, node: NodeId, _link: &Link) {
        self.visit_children(doc, node);
    }

    fn visit_image(&mut self, doc: &Document, node: NodeId, _link: &Link) {
        self.visit_children(doc, node);
    }

    fn visit_custom(&mut self, doc: &Document, node: NodeId, _custom: &dyn CustomNode) {
        self.visit_children(doc, node);
    }

    fn visit_children(&mut self, doc: &Document, node: NodeId) {
        for child in doc.children(node) {
            walk(self, doc, child);
        }
    }
}

/// Dispatches `node` to the matching [`Visitor`] method.
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, doc: &Document, node: NodeId) {
    match doc.value(node) {
        NodeValue::Document => visitor.visit_document(doc, node),
        NodeValue::BlockQuote => visitor.visit_block_quote(doc, node),
        NodeValue::List(list) => visitor.visit_list(doc, node, list),
        NodeValue::Item(item) => visitor.visit_item(doc, node, item),
        NodeValue::CodeBlock(code) => visitor.visit_code_block(doc, node, code),
        NodeValue::HtmlBlock(literal) => visitor.visit_html_block(doc, node, literal),
        NodeValue::Paragraph => visitor.visit_paragraph(doc, node),
        NodeValue::Heading(heading) => visitor.visit_heading(doc, node, heading),
        NodeValue::ThematicBreak => visitor.visit_thematic_break(doc, node),
        NodeValue::Text(literal) => visitor.visit_text(doc, node, literal),
        NodeValue::SoftBreak => visitor.visit_soft_break(doc, node),
        NodeValue::HardBreak => visitor.visit_hard_break(doc, node),
        NodeValue::Code(literal) => visitor.visit_code(doc, node, literal),
        NodeValue::HtmlInline(literal) => visitor.visit_html_inline(doc, node, literal),
        NodeValue::Emphasis(_) => visitor.visit_emphasis(doc, node),
        NodeValue::Strong(_) => visitor.visit_strong(doc, node),
        NodeValue::Link(link) => visitor.visit_link(doc, node, link),
        NodeValue::Image(link) => visitor.visit_image(doc, node, link),
        NodeValue::Custom(custom) => visitor.visit_custom(doc, node, &**custom),
    }
}
