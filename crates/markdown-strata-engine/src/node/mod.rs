//! # Document Tree
//!
//! Arena-backed node graph produced by the block and inline engines.
//!
//! ## Modules
//!
//! - **`value`**: `NodeValue` sum type with one variant per block/inline kind,
//!   plus `Custom` for extension nodes
//! - **`visit`**: `Visitor` with per-variant callbacks and a generic fallback
//!
//! ## Key Invariants
//!
//! - Nodes are addressed by `NodeId`; parents are back-references, never owners
//! - The tree reachable from `root()` is acyclic and stored in document order
//! - Detached nodes stay in the arena but are unreachable from the root

pub mod value;
pub mod visit;

use crate::parsing::references::ReferenceMap;

pub use value::{
    CodeBlock, CustomNode, Fence, FenceKind, Heading, ItemData, Link, ListData, ListKind,
    NodeKind, NodeValue,
};
pub use visit::{Visitor, walk};

/// A detached subtree, built by inline content parsers and attached with
/// [`Document::append_fragment`].
#[derive(Debug)]
pub struct Fragment {
    pub value: NodeValue,
    pub children: Vec<Fragment>,
}

impl Fragment {
    pub fn leaf(value: NodeValue) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    pub fn with_children(value: NodeValue, children: Vec<Fragment>) -> Self {
        Self { value, children }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::leaf(NodeValue::Text(text.into()))
    }
}

/// Index of a node in its [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct Node {
    pub value: NodeValue,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl Node {
    fn new(value: NodeValue) -> Self {
        Self {
            value,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
        }
    }
}

/// Parsed document: the node arena, its root, and the link reference
/// definitions collected while parsing blocks.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    references: ReferenceMap,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeValue::Document)],
            root: NodeId(0),
            references: ReferenceMap::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Finalized link reference definitions, read-only.
    pub fn references(&self) -> &ReferenceMap {
        &self.references
    }

    pub(crate) fn references_mut(&mut self) -> &mut ReferenceMap {
        &mut self.references
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn value(&self, id: NodeId) -> &NodeValue {
        &self.nodes[id.0].value
    }

    pub fn value_mut(&mut self, id: NodeId) -> &mut NodeValue {
        &mut self.nodes[id.0].value
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Pre-order traversal of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            start: id,
            next: Some(id),
        }
    }

    /// Number of nodes reachable from the root, root included.
    pub fn node_count(&self) -> usize {
        self.descendants(self.root).count()
    }

    /// Adds a node to the arena without attaching it anywhere.
    pub fn create(&mut self, value: NodeValue) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(value));
        id
    }

    pub fn append_child(&mut self, parent: NodeId, value: NodeValue) -> NodeId {
        let id = self.create(value);
        self.append(parent, id);
        id
    }

    pub fn prepend_child(&mut self, parent: NodeId, value: NodeValue) -> NodeId {
        let id = self.create(value);
        match self.first_child(parent) {
            Some(first) => self.insert_before(first, id),
            None => self.append(parent, id),
        }
        id
    }

    pub fn append_fragment(&mut self, parent: NodeId, fragment: Fragment) -> NodeId {
        let id = self.append_child(parent, fragment.value);
        for child in fragment.children {
            self.append_fragment(id, child);
        }
        id
    }

    /// Moves `child` (detaching it first) to the end of `parent`'s children.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.nodes[parent.0].last_child;
        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev = last;
        }
        match last {
            Some(last) => self.nodes[last.0].next = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    /// Moves `node` to directly after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
        self.detach(node);
        let parent = self.nodes[sibling.0].parent;
        let next = self.nodes[sibling.0].next;
        {
            let n = &mut self.nodes[node.0];
            n.parent = parent;
            n.prev = Some(sibling);
            n.next = next;
        }
        self.nodes[sibling.0].next = Some(node);
        match next {
            Some(next) => self.nodes[next.0].prev = Some(node),
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.0].last_child = Some(node);
                }
            }
        }
    }

    /// Moves `node` to directly before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        self.detach(node);
        let parent = self.nodes[sibling.0].parent;
        let prev = self.nodes[sibling.0].prev;
        {
            let n = &mut self.nodes[node.0];
            n.parent = parent;
            n.prev = prev;
            n.next = Some(sibling);
        }
        self.nodes[sibling.0].prev = Some(node);
        match prev {
            Some(prev) => self.nodes[prev.0].next = Some(node),
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.0].first_child = Some(node);
                }
            }
        }
    }

    /// Unlinks `id` from its parent and siblings. Its own children stay attached.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let n = &self.nodes[id.0];
            (n.parent, n.prev, n.next)
        };
        match prev {
            Some(prev) => self.nodes[prev.0].next = next,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.0].first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.nodes[next.0].prev = prev,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.0].last_child = prev;
                }
            }
        }
        let n = &mut self.nodes[id.0];
        n.parent = None;
        n.prev = None;
        n.next = None;
    }

    /// Creates a node holding every sibling strictly between `first` and
    /// `last`, and inserts it directly after `first`.
    pub fn wrap_between(&mut self, first: NodeId, last: NodeId, value: NodeValue) -> NodeId {
        let wrapper = self.create(value);
        let mut cursor = self.next_sibling(first);
        while let Some(node) = cursor {
            if node == last {
                break;
            }
            cursor = self.next_sibling(node);
            self.append(wrapper, node);
        }
        self.insert_after(first, wrapper);
        wrapper
    }

    /// Joins runs of adjacent Text nodes below `id` into single nodes.
    pub fn merge_adjacent_text(&mut self, id: NodeId) {
        let parents: Vec<NodeId> = self
            .descendants(id)
            .filter(|&node| self.first_child(node).is_some())
            .collect();
        for parent in parents {
            let mut child = self.first_child(parent);
            while let Some(current) = child {
                if let NodeValue::Text(_) = self.value(current) {
                    while let Some(next) = self.next_sibling(current) {
                        let NodeValue::Text(tail) = self.value(next) else {
                            break;
                        };
                        let tail = tail.clone();
                        if let NodeValue::Text(head) = self.value_mut(current) {
                            head.push_str(&tail);
                        }
                        self.detach(next);
                    }
                }
                child = self.next_sibling(current);
            }
        }
    }

    /// Number of levels below `id`: 0 for a leaf, 1 when it only has leaf
    /// children, and so on.
    pub fn depth_below(&self, id: NodeId) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(id, 0)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.children(node).map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Concatenated literal content of Text and Code nodes below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            match self.value(node) {
                NodeValue::Text(s) | NodeValue::Code(s) => out.push_str(s),
                NodeValue::SoftBreak | NodeValue::HardBreak => out.push('\n'),
                _ => {}
            }
        }
        out
    }
}

pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    start: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = if let Some(child) = self.doc.first_child(current) {
            Some(child)
        } else {
            let mut node = current;
            loop {
                if node == self.start {
                    break None;
                }
                if let Some(sibling) = self.doc.next_sibling(node) {
                    break Some(sibling);
                }
                match self.doc.parent(node) {
                    Some(parent) => node = parent,
                    None => break None,
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(doc: &mut Document, parent: NodeId, s: &str) -> NodeId {
        doc.append_child(parent, NodeValue::Text(s.to_string()))
    }

    fn texts(doc: &Document, parent: NodeId) -> Vec<String> {
        doc.children(parent)
            .filter_map(|id| doc.value(id).text().map(str::to_string))
            .collect()
    }

    #[test]
    fn append_links_siblings_in_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = text(&mut doc, root, "a");
        let b = text(&mut doc, root, "b");

        assert_eq!(doc.first_child(root), Some(a));
        assert_eq!(doc.last_child(root), Some(b));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.previous_sibling(b), Some(a));
        assert_eq!(doc.parent(b), Some(root));
    }

    #[test]
    fn detach_middle_child_relinks_neighbours() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = text(&mut doc, root, "a");
        let b = text(&mut doc, root, "b");
        let c = text(&mut doc, root, "c");

        doc.detach(b);

        assert_eq!(doc.next_sibling(a), Some(c));
        assert_eq!(doc.previous_sibling(c), Some(a));
        assert_eq!(doc.parent(b), None);
        assert_eq!(texts(&doc, root), vec!["a", "c"]);
    }

    #[test]
    fn wrap_between_moves_inner_siblings() {
        let mut doc = Document::new();
        let root = doc.root();
        let open = text(&mut doc, root, "*");
        text(&mut doc, root, "x");
        text(&mut doc, root, "y");
        let close = text(&mut doc, root, "*");

        let em = doc.wrap_between(open, close, NodeValue::Emphasis('*'));

        assert_eq!(doc.next_sibling(open), Some(em));
        assert_eq!(doc.next_sibling(em), Some(close));
        assert_eq!(texts(&doc, em), vec!["x", "y"]);
    }

    #[test]
    fn merge_adjacent_text_recurses_into_containers() {
        let mut doc = Document::new();
        let root = doc.root();
        let para = doc.append_child(root, NodeValue::Paragraph);
        text(&mut doc, para, "a");
        text(&mut doc, para, "b");
        let em = doc.append_child(para, NodeValue::Emphasis('*'));
        text(&mut doc, em, "c");
        text(&mut doc, em, "d");
        text(&mut doc, para, "e");

        doc.merge_adjacent_text(root);

        assert_eq!(texts(&doc, para), vec!["ab", "e"]);
        assert_eq!(texts(&doc, em), vec!["cd"]);
    }

    #[test]
    fn deep_chains_merge_and_measure_without_recursion() {
        let mut doc = Document::new();
        let mut parent = doc.append_child(doc.root(), NodeValue::Paragraph);
        for _ in 0..100_000 {
            parent = doc.append_child(parent, NodeValue::Emphasis('*'));
        }
        text(&mut doc, parent, "a");
        text(&mut doc, parent, "b");

        doc.merge_adjacent_text(doc.root());

        assert_eq!(texts(&doc, parent), vec!["ab"]);
        assert_eq!(doc.depth_below(doc.root()), 100_002);
    }

    #[test]
    fn descendants_are_pre_order_and_scoped() {
        let mut doc = Document::new();
        let root = doc.root();
        let p1 = doc.append_child(root, NodeValue::Paragraph);
        let t1 = text(&mut doc, p1, "one");
        let p2 = doc.append_child(root, NodeValue::Paragraph);
        let t2 = text(&mut doc, p2, "two");

        let all: Vec<_> = doc.descendants(root).collect();
        assert_eq!(all, vec![root, p1, t1, p2, t2]);

        let scoped: Vec<_> = doc.descendants(p1).collect();
        assert_eq!(scoped, vec![p1, t1]);
    }

    #[test]
    fn append_fragment_builds_subtree() {
        let mut doc = Document::new();
        let root = doc.root();
        let link = Link {
            destination: "/u".into(),
            title: None,
        };
        let id = doc.append_fragment(
            root,
            Fragment::with_children(NodeValue::Link(link), vec![Fragment::text("x")]),
        );
        assert_eq!(doc.parent(id), Some(root));
        assert_eq!(texts(&doc, id), vec!["x"]);
    }

    #[test]
    fn prepend_and_insert_before_first() {
        let mut doc = Document::new();
        let root = doc.root();
        text(&mut doc, root, "b");
        doc.prepend_child(root, NodeValue::Text("a".into()));
        assert_eq!(texts(&doc, root), vec!["a", "b"]);
    }
}
