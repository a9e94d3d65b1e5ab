use std::sync::Arc;

use log::{trace, warn};

use super::kinds::{DocumentParser, ParagraphParser};
use super::{BlockContinue, BlockParser, BlockStart, BlockStartFactory, BlockState, MatchedBlock};
use crate::error::{ContractViolation, ParseError, ResourceExhausted};
use crate::node::{Document, NodeId, NodeValue};
use crate::parsing::scan::{Line, LineRef};

/// An open block: its node and the parser deciding its continuation.
struct Frame {
    node: NodeId,
    parser: Box<dyn BlockParser>,
    seq: usize,
}

/// A closed block whose parser still holds raw inline text.
pub struct ParsedBlock {
    pub node: NodeId,
    pub parser: Box<dyn BlockParser>,
    seq: usize,
}

/// Drives the open-blocks stack for one parse.
///
/// Feed lines with [`BlockEngine::parse_line`], then call
/// [`BlockEngine::finish`] to close everything and collect the blocks in
/// document order for inline parsing.
pub struct BlockEngine<'p> {
    block_starts: &'p [Arc<dyn BlockStartFactory>],
    max_nesting_depth: Option<usize>,
    doc: Document,
    line: Line,
    frames: Vec<Frame>,
    closed: Vec<ParsedBlock>,
    next_seq: usize,
}

impl<'p> BlockEngine<'p> {
    pub fn new(block_starts: &'p [Arc<dyn BlockStartFactory>], max_nesting_depth: Option<usize>) -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            block_starts,
            max_nesting_depth,
            doc,
            line: Line::default(),
            frames: vec![Frame {
                node: root,
                parser: Box::new(DocumentParser),
                seq: 0,
            }],
            closed: Vec::new(),
            next_seq: 1,
        }
    }

    pub fn parse_line(&mut self, line: LineRef<'_>) -> Result<(), ParseError> {
        self.line.reset(line);

        // 1. continuation: frame 0 is the document and always continues
        let mut matched = 1;
        while matched < self.frames.len() {
            self.line.find_next_non_space();
            let top = self.frames.len() - 1;
            let active = self.frames[top].node;
            let active_lazy = self.frames[top].parser.can_have_lazy_continuation_lines();
            let state = BlockState::new(&self.line, &self.doc, active, active_lazy);
            let frame = &mut self.frames[matched];
            match frame.parser.try_continue(&state, frame.node) {
                Some(BlockContinue::Finished) => {
                    // the line ends this block and nothing else happens
                    self.close_frames(self.frames.len() - matched);
                    return Ok(());
                }
                Some(BlockContinue::AtIndex(index)) => self.line.advance_to_index(index),
                Some(BlockContinue::AtColumn(column)) => self.line.advance_to_column(column),
                None => break,
            }
            matched += 1;
        }

        // 2. block starts, nested below the last matched frame
        let mut unmatched = self.frames.len() - matched;
        let mut current = matched - 1;
        let mut started_new_block = false;
        let mut try_starts = {
            let frame = &self.frames[current];
            frame.parser.is_container() || matches!(self.doc.value(frame.node), NodeValue::Paragraph)
        };

        while try_starts {
            self.line.find_next_non_space();
            if self.line.is_blank() {
                self.line.advance_to_index(self.line.next_non_space());
                break;
            }

            let Some((start, factory)) = self.find_block_start(current) else {
                self.line.advance_to_index(self.line.next_non_space());
                break;
            };
            if start.parsers.is_empty() {
                return Err(ContractViolation::new(factory, "block start without parsers").into());
            }

            started_new_block = true;
            let before = (self.line.index(), self.line.column());

            if unmatched > 0 {
                self.close_frames(unmatched);
                unmatched = 0;
            }
            if let Some(index) = start.new_index {
                self.line.advance_to_index(index);
            } else if let Some(column) = start.new_column {
                self.line.advance_to_column(column);
            }
            if start.replace_active {
                self.replace_active();
            }

            let container = start.parsers.last().is_some_and(|p| p.is_container());
            if container && before == (self.line.index(), self.line.column()) {
                return Err(
                    ContractViolation::new(factory, "container start consumed no input").into(),
                );
            }
            for parser in start.parsers {
                try_starts = parser.is_container();
                self.add_child(parser)?;
            }
            current = self.frames.len() - 1;
        }

        // 3. remaining text goes to the innermost block
        let top = self.frames.len() - 1;
        let lazy = !started_new_block
            && !self.line.is_blank()
            && self.frames[top].parser.can_have_lazy_continuation_lines();
        if lazy {
            let rest = self.line.remaining().into_owned();
            self.frames[top].parser.add_line(&rest);
            return Ok(());
        }

        if unmatched > 0 {
            self.close_frames(unmatched);
        }
        let top = self.frames.len() - 1;
        if !self.frames[top].parser.is_container() {
            let rest = self.line.remaining().into_owned();
            self.frames[top].parser.add_line(&rest);
        } else if !self.line.is_blank() {
            self.add_child(Box::new(ParagraphParser::new()))?;
            let rest = self.line.remaining().into_owned();
            let top = self.frames.len() - 1;
            self.frames[top].parser.add_line(&rest);
        }
        Ok(())
    }

    /// Closes every open block and returns the document together with the
    /// blocks in document order.
    pub fn finish(mut self) -> (Document, Vec<ParsedBlock>) {
        self.close_frames(self.frames.len());
        let mut closed = self.closed;
        closed.sort_by_key(|block| block.seq);
        (self.doc, closed)
    }

    fn find_block_start(&self, current: usize) -> Option<(BlockStart, &'static str)> {
        let top = self.frames.len() - 1;
        let active = self.frames[top].node;
        let active_lazy = self.frames[top].parser.can_have_lazy_continuation_lines();
        let state = BlockState::new(&self.line, &self.doc, active, active_lazy);

        let frame = &self.frames[current];
        let paragraph_lines = frame.parser.paragraph_lines().filter(|lines| !lines.is_empty());
        let matched = MatchedBlock::new(frame.node, self.doc.value(frame.node), paragraph_lines);

        self.block_starts
            .iter()
            .find_map(|factory| factory.try_start(&state, &matched).map(|start| (start, factory.name())))
    }

    fn add_child(&mut self, parser: Box<dyn BlockParser>) -> Result<(), ParseError> {
        let value = parser.create_node();
        loop {
            let top = self.frames.len() - 1;
            let frame = &mut self.frames[top];
            if frame.parser.can_contain(&value, &mut self.doc, frame.node) {
                break;
            }
            self.close_frames(1);
        }

        // the document frame does not count towards the depth
        if let Some(limit) = self.max_nesting_depth
            && self.frames.len() > limit
        {
            warn!("Block nesting limit {limit} reached at line {}", self.line.number() + 1);
            return Err(ResourceExhausted::NestingTooDeep {
                limit,
                line: self.line.number() + 1,
            }
            .into());
        }

        let parent = self.frames[self.frames.len() - 1].node;
        trace!("open {:?} at line {}", value.kind(), self.line.number() + 1);
        let node = self.doc.append_child(parent, value);
        self.frames.push(Frame {
            node,
            parser,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        Ok(())
    }

    fn close_frames(&mut self, count: usize) {
        for _ in 0..count {
            let Some(mut frame) = self.frames.pop() else {
                return;
            };
            self.take_definitions(frame.parser.as_mut());
            frame.parser.close_block(&mut self.doc, frame.node);
            trace!("close {:?}", self.doc.value(frame.node).kind());
            self.closed.push(ParsedBlock {
                node: frame.node,
                parser: frame.parser,
                seq: frame.seq,
            });
        }
    }

    /// Drops the active block in favour of the block about to be added.
    fn replace_active(&mut self) {
        let Some(mut frame) = self.frames.pop() else {
            return;
        };
        self.take_definitions(frame.parser.as_mut());
        self.doc.detach(frame.node);
    }

    fn take_definitions(&mut self, parser: &mut dyn BlockParser) {
        for definition in parser.take_definitions() {
            self.doc
                .references_mut()
                .define(&definition.label, definition.destination, definition.title);
        }
    }
}
