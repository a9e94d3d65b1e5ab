use std::fmt;

use downcast_rs::{Downcast, impl_downcast};

/// Payload of a tree node.
///
/// Block and inline variants share one enum so that a single arena can hold
/// the whole document. Extension nodes live in [`NodeValue::Custom`].
#[derive(Debug)]
pub enum NodeValue {
    // Blocks
    Document,
    BlockQuote,
    List(ListData),
    Item(ItemData),
    CodeBlock(CodeBlock),
    HtmlBlock(String),
    Paragraph,
    Heading(Heading),
    ThematicBreak,

    // Inlines
    Text(String),
    SoftBreak,
    HardBreak,
    Code(String),
    HtmlInline(String),
    Emphasis(char),
    Strong(char),
    Link(Link),
    Image(Link),

    Custom(Box<dyn CustomNode>),
}

impl NodeValue {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeValue::Document => NodeKind::Document,
            NodeValue::BlockQuote => NodeKind::BlockQuote,
            NodeValue::List(_) => NodeKind::List,
            NodeValue::Item(_) => NodeKind::Item,
            NodeValue::CodeBlock(_) => NodeKind::CodeBlock,
            NodeValue::HtmlBlock(_) => NodeKind::HtmlBlock,
            NodeValue::Paragraph => NodeKind::Paragraph,
            NodeValue::Heading(_) => NodeKind::Heading,
            NodeValue::ThematicBreak => NodeKind::ThematicBreak,
            NodeValue::Text(_) => NodeKind::Text,
            NodeValue::SoftBreak => NodeKind::SoftBreak,
            NodeValue::HardBreak => NodeKind::HardBreak,
            NodeValue::Code(_) => NodeKind::Code,
            NodeValue::HtmlInline(_) => NodeKind::HtmlInline,
            NodeValue::Emphasis(_) => NodeKind::Emphasis,
            NodeValue::Strong(_) => NodeKind::Strong,
            NodeValue::Link(_) => NodeKind::Link,
            NodeValue::Image(_) => NodeKind::Image,
            NodeValue::Custom(_) => NodeKind::Custom,
        }
    }

    pub fn is_block(&self) -> bool {
        match self {
            NodeValue::Custom(custom) => custom.is_block(),
            other => other.kind().is_block(),
        }
    }

    /// Literal text of Text nodes.
    pub fn text(&self) -> Option<&str> {
        match self {
            NodeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_custom<T: CustomNode>(&self) -> Option<&T> {
        match self {
            NodeValue::Custom(custom) => (**custom).downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn custom(node: impl CustomNode) -> Self {
        NodeValue::Custom(Box::new(node))
    }
}

/// Variant tag of a [`NodeValue`], cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    BlockQuote,
    List,
    Item,
    CodeBlock,
    HtmlBlock,
    Paragraph,
    Heading,
    ThematicBreak,
    Text,
    SoftBreak,
    HardBreak,
    Code,
    HtmlInline,
    Emphasis,
    Strong,
    Link,
    Image,
    Custom,
}

impl NodeKind {
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::BlockQuote
                | NodeKind::List
                | NodeKind::Item
                | NodeKind::CodeBlock
                | NodeKind::HtmlBlock
                | NodeKind::Paragraph
                | NodeKind::Heading
                | NodeKind::ThematicBreak
        )
    }
}

/// Node type contributed by an extension.
///
/// `name` is the key renderers use to find a handler for the node.
pub trait CustomNode: Downcast + fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn is_block(&self) -> bool {
        false
    }
}
impl_downcast!(CustomNode);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet { marker: char },
    Ordered { start: u32, delimiter: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListData {
    pub kind: ListKind,
    pub tight: bool,
}

/// Columns are measured from the start of the item's containing block.
///
/// For `  1. Foo`: `marker_indent == 2`, `content_indent == 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemData {
    pub marker_indent: usize,
    pub content_indent: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub setext: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '`' => Some(FenceKind::Backticks),
            '~' => Some(FenceKind::Tildes),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    pub kind: FenceKind,
    pub length: usize,
    pub indent: usize,
}

/// Fenced or indented code. `fence` is `None` for indented code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    pub fence: Option<Fence>,
    pub info: String,
    pub literal: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub destination: String,
    pub title: Option<String>,
}
