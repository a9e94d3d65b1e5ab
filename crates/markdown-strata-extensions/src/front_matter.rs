//! YAML front matter: a `---` block on the first line of the document.
//!
//! Only the subset of YAML that metadata headers use is understood: `key:
//! value` pairs, `key:` followed by `- item` lines, and `key: |` literal
//! blocks. Values are kept as strings. Nothing is rendered.

use std::sync::OnceLock;

use log::debug;
use markdown_strata_engine::node::Document;
use markdown_strata_engine::parsing::blocks::{BlockContinue, BlockState, MatchedBlock};
use markdown_strata_engine::render::{HtmlContext, HtmlNodeRenderer};
use markdown_strata_engine::{
    BlockParser, BlockStart, BlockStartFactory, CustomNode, Extension, HtmlRendererBuilder, NodeId,
    NodeValue, ParserBuilder, Placement, Visitor, walk,
};
use regex::Regex;

fn metadata_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[ ]{0,3}([A-Za-z0-9._-]+):\s*(.*)$").expect("Invalid metadata regex"))
}

fn list_item_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[ ]+-\s*(.*)$").expect("Invalid metadata list regex"))
}

fn literal_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\s*(.*)$").expect("Invalid metadata literal regex"))
}

fn begin_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^-{3}(\s.*)?$").expect("Invalid front matter begin regex"))
}

fn end_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^(-{3}|\.{3})(\s.*)?$").expect("Invalid front matter end regex"))
}

/// The whole front matter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YamlFrontMatterBlock;

impl CustomNode for YamlFrontMatterBlock {
    fn name(&self) -> &'static str {
        "yaml_front_matter_block"
    }

    fn is_block(&self) -> bool {
        true
    }
}

/// One key with its values, a child of [`YamlFrontMatterBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlFrontMatterNode {
    pub key: String,
    pub values: Vec<String>,
}

impl CustomNode for YamlFrontMatterNode {
    fn name(&self) -> &'static str {
        "yaml_front_matter"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFrontMatterExtension;

impl Extension for YamlFrontMatterExtension {
    fn name(&self) -> &'static str {
        "front_matter"
    }

    fn extend_parser(&self, builder: &mut ParserBuilder) {
        // ahead of thematic breaks, which would claim the `---`
        builder.block_start(FrontMatterStart, Placement::First);
    }

    fn extend_html(&self, builder: &mut HtmlRendererBuilder) {
        builder.node_renderer(FrontMatterHtmlRenderer);
    }
}

/// Key/value pairs of the document's front matter, in document order.
pub fn front_matter(doc: &Document) -> Vec<(String, Vec<String>)> {
    let mut visitor = FrontMatterVisitor::default();
    walk(&mut visitor, doc, doc.root());
    visitor.data
}

#[derive(Default)]
struct FrontMatterVisitor {
    data: Vec<(String, Vec<String>)>,
}

impl Visitor for FrontMatterVisitor {
    fn visit_custom(&mut self, doc: &Document, node: NodeId, custom: &dyn CustomNode) {
        if let Some(entry) = custom.downcast_ref::<YamlFrontMatterNode>() {
            match self.data.iter_mut().find(|(key, _)| *key == entry.key) {
                Some((_, values)) => values.clone_from(&entry.values),
                None => self.data.push((entry.key.clone(), entry.values.clone())),
            }
        }
        self.visit_children(doc, node);
    }
}

struct FrontMatterStart;

impl BlockStartFactory for FrontMatterStart {
    fn name(&self) -> &'static str {
        "front_matter"
    }

    fn try_start(&self, state: &BlockState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        let at_top = matches!(matched.value, NodeValue::Document)
            && state.document().first_child(matched.node).is_none();
        if !at_top || !begin_regex().is_match(state.line()) {
            return None;
        }
        Some(BlockStart::single(FrontMatterParser::default()).at_index(state.line().len()))
    }
}

#[derive(Debug, Default)]
struct FrontMatterParser {
    entries: Vec<YamlFrontMatterNode>,
    current: Option<YamlFrontMatterNode>,
    in_literal: bool,
}

impl FrontMatterParser {
    fn flush(&mut self) {
        if let Some(entry) = self.current.take() {
            self.entries.push(entry);
        }
    }
}

impl BlockParser for FrontMatterParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::custom(YamlFrontMatterBlock)
    }

    fn try_continue(&mut self, state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        if end_regex().is_match(state.line()) {
            return Some(BlockContinue::Finished);
        }
        Some(BlockContinue::AtIndex(state.index()))
    }

    fn add_line(&mut self, line: &str) {
        if let Some(captures) = metadata_regex().captures(line) {
            self.flush();
            let value = &captures[2];
            self.in_literal = value == "|";
            let mut values = Vec::new();
            if !self.in_literal && !value.is_empty() {
                values.push(parse_string(value));
            }
            self.current = Some(YamlFrontMatterNode {
                key: captures[1].to_string(),
                values,
            });
            return;
        }

        let Some(current) = self.current.as_mut() else {
            return;
        };
        if self.in_literal {
            if let Some(captures) = literal_regex().captures(line) {
                let text = captures[1].trim();
                match current.values.as_mut_slice() {
                    [only] => {
                        only.push('\n');
                        only.push_str(text);
                    }
                    _ => current.values.push(text.to_string()),
                }
            }
        } else if let Some(captures) = list_item_regex().captures(line) {
            current.values.push(parse_string(&captures[1]));
        }
    }

    fn close_block(&mut self, doc: &mut Document, node: NodeId) {
        self.flush();
        debug!("Front matter with {} keys", self.entries.len());
        for entry in self.entries.drain(..) {
            doc.append_child(node, NodeValue::custom(entry));
        }
    }
}

/// Unquotes single- and double-quoted scalars. In double quotes only `\"`
/// and `\\` are unescaped.
fn parse_string(s: &str) -> String {
    if s.len() >= 2 {
        if let Some(inner) = s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
            return inner.replace("''", "'");
        }
        if let Some(inner) = s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            return inner.replace("\\\"", "\"").replace("\\\\", "\\");
        }
    }
    s.to_string()
}

struct FrontMatterHtmlRenderer;

impl HtmlNodeRenderer for FrontMatterHtmlRenderer {
    fn node_name(&self) -> &'static str {
        "yaml_front_matter_block"
    }

    fn render(&self, _ctx: &mut HtmlContext<'_>, _node: NodeId) {}
}
