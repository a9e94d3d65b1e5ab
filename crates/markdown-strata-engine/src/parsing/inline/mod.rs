//! # Inline Parsing
//!
//! Turns a block's raw text into inline nodes with a delimiter stack.
//!
//! ## Modules
//!
//! - **`cursor`**: `Cursor` for byte-position inline scanning
//! - **`link`**: scanners for link labels, destinations and titles
//! - **`delimiter`**: delimiter and bracket stack entries, `DelimiterRun`
//! - **`parser`**: `InlineParser`, the scan and the delimiter/bracket resolution
//! - **`kinds`**: core content parsers (escapes, code spans, entities,
//!   autolinks, raw HTML) and the emphasis delimiter processor
//!
//! ## Key Invariants
//!
//! - Every delimiter character is its own Text node until matched
//! - No delimiter or bracket entry outlives one block's parse
//! - Adjacent Text nodes are merged when a block finishes
//! - Extension content parsers for a character run before the core ones

pub mod cursor;
pub mod delimiter;
pub mod kinds;
pub mod link;
pub mod parser;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::BuildError;
use crate::node::{Document, Fragment};

pub use cursor::Cursor;
pub use delimiter::DelimiterRun;
pub use parser::InlineParser;

/// Parses an inline construct starting at one of its trigger characters.
///
/// `try_parse` is called with the cursor on the trigger. On success it leaves
/// the cursor after the construct; it must consume at least one character.
/// On `None` the engine restores the position.
pub trait InlineContentParser: Send + Sync {
    fn trigger_chars(&self) -> &[char];

    fn try_parse(&self, cur: &mut Cursor<'_>) -> Option<Fragment>;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Resolves a pair of delimiter runs into a node, the way emphasis does.
pub trait DelimiterProcessor: Send + Sync {
    fn opening_char(&self) -> char;

    fn closing_char(&self) -> char;

    /// Runs shorter than this are plain text.
    fn min_length(&self) -> usize {
        1
    }

    /// Wraps the nodes between the runs and returns how many delimiter
    /// characters were used from each run, or 0 to reject this opener.
    fn process(&self, opening: &DelimiterRun<'_>, closing: &DelimiterRun<'_>, doc: &mut Document) -> usize;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Merged inline syntax of the core and all extensions, fixed at build time.
#[derive(Clone, Default)]
pub struct InlineSyntax {
    content_parsers: HashMap<char, Vec<Arc<dyn InlineContentParser>>>,
    delimiter_processors: HashMap<char, Arc<dyn DelimiterProcessor>>,
    special: HashSet<char>,
}

impl InlineSyntax {
    /// Characters the engine always handles itself.
    pub const STRUCTURAL: [char; 4] = ['\n', '[', ']', '!'];

    pub fn new(
        extension_parsers: &[Arc<dyn InlineContentParser>],
        core_parsers: &[Arc<dyn InlineContentParser>],
        processors: &[Arc<dyn DelimiterProcessor>],
    ) -> Result<Self, BuildError> {
        let mut syntax = InlineSyntax::default();
        syntax.special.extend(Self::STRUCTURAL);

        for parser in extension_parsers.iter().chain(core_parsers) {
            syntax.add_content_parser(parser);
        }
        for processor in processors {
            syntax.add_delimiter_processor(processor)?;
        }
        Ok(syntax)
    }

    /// Plain CommonMark: core content parsers and emphasis only.
    pub fn core() -> Self {
        let mut syntax = InlineSyntax::default();
        syntax.special.extend(Self::STRUCTURAL);
        for parser in &kinds::core_content_parsers() {
            syntax.add_content_parser(parser);
        }
        for processor in kinds::core_delimiter_processors() {
            let c = processor.opening_char();
            syntax.delimiter_processors.insert(c, processor);
            syntax.special.insert(c);
        }
        syntax
    }

    fn add_content_parser(&mut self, parser: &Arc<dyn InlineContentParser>) {
        for &c in parser.trigger_chars() {
            self.content_parsers.entry(c).or_default().push(Arc::clone(parser));
            self.special.insert(c);
        }
    }

    fn add_delimiter_processor(&mut self, processor: &Arc<dyn DelimiterProcessor>) -> Result<(), BuildError> {
        let opening = processor.opening_char();
        let closing = processor.closing_char();
        let chars: &[char] = if opening == closing {
            &[opening]
        } else {
            &[opening, closing]
        };
        for &c in chars {
            if self.delimiter_processors.contains_key(&c) {
                return Err(BuildError::DelimiterConflict(c));
            }
            self.delimiter_processors.insert(c, Arc::clone(processor));
            self.special.insert(c);
        }
        Ok(())
    }

    pub fn is_special(&self, c: char) -> bool {
        self.special.contains(&c)
    }

    pub fn content_parsers(&self, c: char) -> &[Arc<dyn InlineContentParser>] {
        self.content_parsers.get(&c).map_or(&[], Vec::as_slice)
    }

    pub fn delimiter_processor(&self, c: char) -> Option<&Arc<dyn DelimiterProcessor>> {
        self.delimiter_processors.get(&c)
    }
}

impl std::fmt::Debug for InlineSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut delimiters: Vec<_> = self.delimiter_processors.keys().collect();
        delimiters.sort();
        let mut triggers: Vec<_> = self.content_parsers.keys().collect();
        triggers.sort();
        f.debug_struct("InlineSyntax")
            .field("triggers", &triggers)
            .field("delimiters", &delimiters)
            .finish()
    }
}
