//! # Parsing
//!
//! Two phases: block structure first, then inline content of every leaf block.
//!
//! ## Modules
//!
//! - **`scan`**: line splitting, tab-aware `Line` cursor with column tracking
//! - **`source`**: raw inline text a block holds until block parsing is done
//! - **`blocks`**: `BlockEngine` and the open-blocks stack, core block kinds
//! - **`inline`**: `InlineParser` with the delimiter stack, core inline kinds
//! - **`references`**: link reference definitions and their lookup table
//! - **`registry`**: `Extension`, `PostProcessor` and block-start placement
//! - **`snapshot`**: stable tree dumps and structural invariant checks
//!
//! ## Key Invariants
//!
//! - Inline parsing starts only after the last line is consumed, so every
//!   reference definition is visible to every block
//! - A built `Parser` is immutable; each `parse` call owns all of its state
//! - Malformed input never fails a parse; only configured limits and
//!   misbehaving extensions do

pub mod blocks;
pub mod html_patterns;
pub mod inline;
pub mod references;
pub mod registry;
pub mod scan;
pub mod snapshot;
pub mod source;
pub mod text;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::{BuildError, ParseError, ResourceExhausted};
use crate::node::Document;

use blocks::kinds::core_block_starts;
use blocks::{BlockEngine, BlockStartFactory, BlockType};
use inline::kinds::{core_content_parsers, core_delimiter_processors};
use inline::{DelimiterProcessor, InlineContentParser, InlineParser, InlineSyntax};
use registry::{Extension, Placement, PostProcessor, order_block_starts};

/// Default bound on open block depth.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// A configured Markdown parser.
///
/// Cheap to clone and safe to share between threads; every call to
/// [`Parser::parse`] works on its own state.
#[derive(Clone)]
pub struct Parser {
    inner: Arc<ParserInner>,
}

struct ParserInner {
    block_starts: Vec<Arc<dyn BlockStartFactory>>,
    syntax: InlineSyntax,
    post_processors: Vec<Arc<dyn PostProcessor>>,
    max_input_bytes: Option<usize>,
    max_nesting_depth: Option<usize>,
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// CommonMark without extensions and with the default limits.
    pub fn commonmark() -> Self {
        Self {
            inner: Arc::new(ParserInner {
                block_starts: core_block_starts(),
                syntax: InlineSyntax::core(),
                post_processors: Vec::new(),
                max_input_bytes: None,
                max_nesting_depth: Some(DEFAULT_MAX_NESTING_DEPTH),
            }),
        }
    }

    pub fn parse(&self, input: &str) -> Result<Document, ParseError> {
        let inner = &*self.inner;
        if let Some(limit) = inner.max_input_bytes
            && input.len() > limit
        {
            warn!("Input of {} bytes exceeds the limit of {limit} bytes", input.len());
            return Err(ResourceExhausted::InputTooLarge {
                size: input.len(),
                limit,
            }
            .into());
        }

        let mut engine = BlockEngine::new(&inner.block_starts, inner.max_nesting_depth);
        let mut line_count = 0;
        for line in scan::lines(input) {
            engine.parse_line(line)?;
            line_count += 1;
        }
        let (mut doc, blocks) = engine.finish();

        let mut inlines =
            InlineParser::new(&inner.syntax).with_max_nesting_depth(inner.max_nesting_depth);
        for mut block in blocks {
            block.parser.parse_inlines(block.node, &mut doc, &mut inlines)?;
        }

        for post_processor in &inner.post_processors {
            post_processor.process(&mut doc);
        }

        debug!(
            "Parsed {line_count} lines into {} nodes ({} reference definitions)",
            doc.node_count(),
            doc.references().len()
        );
        Ok(doc)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::commonmark()
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = &*self.inner;
        f.debug_struct("Parser")
            .field(
                "block_starts",
                &inner.block_starts.iter().map(|b| b.name()).collect::<Vec<_>>(),
            )
            .field("syntax", &inner.syntax)
            .field("post_processors", &inner.post_processors.len())
            .field("max_input_bytes", &inner.max_input_bytes)
            .field("max_nesting_depth", &inner.max_nesting_depth)
            .finish()
    }
}

/// Collects core settings and extension contributions for a [`Parser`].
///
/// Methods take `&mut self` so that [`Extension::extend_parser`] can work on
/// the same builder the caller holds.
pub struct ParserBuilder {
    enabled: HashSet<BlockType>,
    block_starts: Vec<(Arc<dyn BlockStartFactory>, Placement)>,
    content_parsers: Vec<Arc<dyn InlineContentParser>>,
    delimiter_processors: Vec<Arc<dyn DelimiterProcessor>>,
    post_processors: Vec<Arc<dyn PostProcessor>>,
    max_input_bytes: Option<usize>,
    max_nesting_depth: Option<usize>,
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self {
            enabled: BlockType::ALL.into_iter().collect(),
            block_starts: Vec::new(),
            content_parsers: Vec::new(),
            delimiter_processors: Vec::new(),
            post_processors: Vec::new(),
            max_input_bytes: None,
            max_nesting_depth: Some(DEFAULT_MAX_NESTING_DEPTH),
        }
    }

    pub fn extension(&mut self, extension: &dyn Extension) -> &mut Self {
        debug!("Registering extension {}", extension.name());
        extension.extend_parser(self);
        self
    }

    pub fn extensions<'e>(
        &mut self,
        extensions: impl IntoIterator<Item = &'e Arc<dyn Extension>>,
    ) -> &mut Self {
        for extension in extensions {
            self.extension(extension.as_ref());
        }
        self
    }

    /// Restricts which core block types may open. Paragraphs are always on.
    pub fn enabled_block_types(&mut self, types: impl IntoIterator<Item = BlockType>) -> &mut Self {
        self.enabled = types.into_iter().collect();
        self
    }

    pub fn max_input_bytes(&mut self, limit: Option<usize>) -> &mut Self {
        self.max_input_bytes = limit;
        self
    }

    /// Bounds both open block depth and the inline levels below any block.
    /// Renderers and visitors recurse per level, so `None` is only safe for
    /// trusted input.
    pub fn max_nesting_depth(&mut self, limit: Option<usize>) -> &mut Self {
        self.max_nesting_depth = limit;
        self
    }

    pub fn block_start(
        &mut self,
        factory: impl BlockStartFactory + 'static,
        placement: Placement,
    ) -> &mut Self {
        self.block_starts.push((Arc::new(factory), placement));
        self
    }

    pub fn inline_content_parser(&mut self, parser: impl InlineContentParser + 'static) -> &mut Self {
        self.content_parsers.push(Arc::new(parser));
        self
    }

    pub fn delimiter_processor(&mut self, processor: impl DelimiterProcessor + 'static) -> &mut Self {
        self.delimiter_processors.push(Arc::new(processor));
        self
    }

    pub fn post_processor(&mut self, post_processor: impl PostProcessor + 'static) -> &mut Self {
        self.post_processors.push(Arc::new(post_processor));
        self
    }

    pub fn build(&self) -> Result<Parser, BuildError> {
        let block_starts = order_block_starts(core_block_starts(), &self.block_starts, &self.enabled)?;

        let processors: Vec<_> = core_delimiter_processors()
            .into_iter()
            .chain(self.delimiter_processors.iter().cloned())
            .collect();
        let syntax = InlineSyntax::new(&self.content_parsers, &core_content_parsers(), &processors)?;

        debug!(
            "Built parser with {} block starts and {} post-processors",
            block_starts.len(),
            self.post_processors.len()
        );
        Ok(Parser {
            inner: Arc::new(ParserInner {
                block_starts,
                syntax,
                post_processors: self.post_processors.clone(),
                max_input_bytes: self.max_input_bytes,
                max_nesting_depth: self.max_nesting_depth,
            }),
        })
    }
}
