//! # Block Parsing
//!
//! Open-blocks stack model: each input line is matched against the blocks
//! that are still open, then offered to block-start matchers, and whatever is
//! left becomes content of the innermost block.
//!
//! ## Modules
//!
//! - **`engine`**: `BlockEngine`, the per-parse state machine driving the stack
//! - **`kinds`**: one `BlockParser` plus `BlockStartFactory` per core block type
//!
//! ## Key Invariants
//!
//! - The document frame is always at the bottom of the stack and never closes
//!   before end of input
//! - A block's node is attached to the tree when its frame is pushed
//! - Raw inline text stays in the parser until every block is closed
//! - Container starts must consume part of the line

pub mod engine;
pub mod kinds;

use crate::error::ParseError;
use crate::node::{Document, NodeId, NodeValue};
use crate::parsing::inline::InlineParser;
use crate::parsing::references::LinkReference;
use crate::parsing::scan::Line;

pub use engine::{BlockEngine, ParsedBlock};

/// State of one open block.
///
/// The engine owns the node; the parser owns whatever it needs to decide
/// continuation and to finish the node when the block closes.
pub trait BlockParser: Send {
    /// Initial value for the node the engine attaches when this parser opens.
    fn create_node(&self) -> NodeValue;

    fn is_container(&self) -> bool {
        false
    }

    fn can_have_lazy_continuation_lines(&self) -> bool {
        false
    }

    /// Called before a child block is attached below this one.
    fn can_contain(&mut self, _child: &NodeValue, _doc: &mut Document, _node: NodeId) -> bool {
        false
    }

    /// Decides whether the current line continues this block.
    fn try_continue(&mut self, state: &BlockState<'_>, node: NodeId) -> Option<BlockContinue>;

    fn add_line(&mut self, _line: &str) {}

    fn close_block(&mut self, _doc: &mut Document, _node: NodeId) {}

    /// Link reference definitions to hand to the document when this block
    /// closes or is replaced.
    fn take_definitions(&mut self) -> Vec<LinkReference> {
        Vec::new()
    }

    /// Paragraph text available to block starts that reinterpret a
    /// paragraph (setext headings, table headers).
    fn paragraph_lines(&self) -> Option<&[String]> {
        None
    }

    /// Second phase: turn raw text into inline children of `node`.
    fn parse_inlines(
        &mut self,
        _node: NodeId,
        _doc: &mut Document,
        _inlines: &mut InlineParser<'_>,
    ) -> Result<(), ParseError> {
        Ok(())
    }
}

/// Recognizes the start of a block type on the current line.
pub trait BlockStartFactory: Send + Sync {
    /// Stable name used for ordering and for enabling core types.
    fn name(&self) -> &'static str;

    fn try_start(&self, state: &BlockState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart>;
}

/// Result of [`BlockParser::try_continue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContinue {
    /// Continue with the rest of the line starting at this byte index.
    AtIndex(usize),
    /// Continue with the rest of the line starting at this column.
    AtColumn(usize),
    /// The line completes the block (for example a closing code fence).
    Finished,
}

/// Result of [`BlockStartFactory::try_start`].
pub struct BlockStart {
    pub(crate) parsers: Vec<Box<dyn BlockParser>>,
    pub(crate) new_index: Option<usize>,
    pub(crate) new_column: Option<usize>,
    pub(crate) replace_active: bool,
}

impl BlockStart {
    /// Opens `parsers` in order, each nested in the previous one.
    pub fn of(parsers: Vec<Box<dyn BlockParser>>) -> Self {
        Self {
            parsers,
            new_index: None,
            new_column: None,
            replace_active: false,
        }
    }

    pub fn single(parser: impl BlockParser + 'static) -> Self {
        Self::of(vec![Box::new(parser)])
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.new_index = Some(index);
        self
    }

    pub fn at_column(mut self, column: usize) -> Self {
        self.new_column = Some(column);
        self
    }

    /// The new block takes the place of the active block (a paragraph)
    /// instead of being nested below it.
    pub fn replace_active_block(mut self) -> Self {
        self.replace_active = true;
        self
    }
}

/// Read-only view of the line and the open blocks, handed to parsers and
/// block-start factories.
pub struct BlockState<'a> {
    line: &'a Line,
    doc: &'a Document,
    active: NodeId,
    active_lazy: bool,
}

impl<'a> BlockState<'a> {
    pub(crate) fn new(line: &'a Line, doc: &'a Document, active: NodeId, active_lazy: bool) -> Self {
        Self {
            line,
            doc,
            active,
            active_lazy,
        }
    }

    /// The full line, including parts already consumed by containers.
    pub fn line(&self) -> &'a str {
        self.line.content()
    }

    /// Zero-based line number.
    pub fn line_number(&self) -> usize {
        self.line.number()
    }

    pub fn index(&self) -> usize {
        self.line.index()
    }

    pub fn column(&self) -> usize {
        self.line.column()
    }

    pub fn next_non_space_index(&self) -> usize {
        self.line.next_non_space()
    }

    pub fn next_non_space_column(&self) -> usize {
        self.line.next_non_space_column()
    }

    pub fn indent(&self) -> usize {
        self.line.indent()
    }

    pub fn is_blank(&self) -> bool {
        self.line.is_blank()
    }

    /// Line text from the next non-space character on.
    pub fn rest(&self) -> &'a str {
        let line = self.line.content();
        &line[self.line.next_non_space().min(line.len())..]
    }

    pub fn active_block(&self) -> &'a NodeValue {
        self.doc.value(self.active)
    }

    pub fn active_can_have_lazy_continuation(&self) -> bool {
        self.active_lazy
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }
}

/// The deepest open block that matched the current line's continuation.
pub struct MatchedBlock<'a> {
    pub node: NodeId,
    pub value: &'a NodeValue,
    paragraph_lines: Option<&'a [String]>,
}

impl<'a> MatchedBlock<'a> {
    pub(crate) fn new(node: NodeId, value: &'a NodeValue, paragraph_lines: Option<&'a [String]>) -> Self {
        Self {
            node,
            value,
            paragraph_lines,
        }
    }

    /// Non-empty paragraph lines when the matched block is a paragraph.
    pub fn paragraph_lines(&self) -> &'a [String] {
        self.paragraph_lines.unwrap_or(&[])
    }
}

/// Core block types that can be switched off with
/// [`ParserBuilder::enabled_block_types`](crate::parsing::ParserBuilder::enabled_block_types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    BlockQuote,
    Heading,
    FencedCode,
    HtmlBlock,
    ThematicBreak,
    List,
    IndentedCode,
}

impl BlockType {
    pub const ALL: [BlockType; 7] = [
        BlockType::BlockQuote,
        BlockType::Heading,
        BlockType::FencedCode,
        BlockType::HtmlBlock,
        BlockType::ThematicBreak,
        BlockType::List,
        BlockType::IndentedCode,
    ];

    /// Name of the core block-start matcher for this type.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::BlockQuote => "block_quote",
            BlockType::Heading => "heading",
            BlockType::FencedCode => "fenced_code",
            BlockType::HtmlBlock => "html_block",
            BlockType::ThematicBreak => "thematic_break",
            BlockType::List => "list",
            BlockType::IndentedCode => "indented_code",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}
