use crate::node::{Document, ItemData, ListData, ListKind, NodeId, NodeValue};
use crate::parsing::blocks::{
    BlockContinue, BlockParser, BlockStart, BlockStartFactory, BlockState, MatchedBlock,
};
use crate::parsing::scan::{CODE_BLOCK_INDENT, columns_to_next_tab_stop};

pub struct ListMarker;

impl ListMarker {
    pub const BULLETS: [u8; 3] = [b'-', b'+', b'*'];
    pub const ORDERED_DELIMITERS: [u8; 2] = [b'.', b')'];
    pub const MAX_DIGITS: usize = 9;

    /// Parses a list marker at the start of `rest`, returning the list kind
    /// and the marker's byte length.
    pub fn parse(rest: &str) -> Option<(ListKind, usize)> {
        let bytes = rest.as_bytes();
        let first = *bytes.first()?;
        let (kind, len) = if Self::BULLETS.contains(&first) {
            (
                ListKind::Bullet {
                    marker: first as char,
                },
                1,
            )
        } else {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits == 0 || digits > Self::MAX_DIGITS {
                return None;
            }
            let delimiter = *bytes.get(digits)?;
            if !Self::ORDERED_DELIMITERS.contains(&delimiter) {
                return None;
            }
            let start = rest[..digits].parse().ok()?;
            (
                ListKind::Ordered {
                    start,
                    delimiter: delimiter as char,
                },
                digits + 1,
            )
        };
        match bytes.get(len) {
            None | Some(b' ' | b'\t') => Some((kind, len)),
            Some(_) => None,
        }
    }

    /// Whether an item with `kind` continues a list of `existing` kind.
    pub fn same_list(existing: ListKind, kind: ListKind) -> bool {
        match (existing, kind) {
            (ListKind::Bullet { marker: a }, ListKind::Bullet { marker: b }) => a == b,
            (ListKind::Ordered { delimiter: a, .. }, ListKind::Ordered { delimiter: b, .. }) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct ListParser {
    data: ListData,
    had_blank_line: bool,
    lines_after_blank: usize,
}

impl ListParser {
    pub fn new(kind: ListKind) -> Self {
        Self {
            data: ListData { kind, tight: true },
            had_blank_line: false,
            lines_after_blank: 0,
        }
    }
}

impl BlockParser for ListParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::List(self.data)
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&mut self, child: &NodeValue, doc: &mut Document, node: NodeId) -> bool {
        if !matches!(child, NodeValue::Item(_)) {
            return false;
        }
        // a blank line right before another item makes the list loose
        if self.had_blank_line && self.lines_after_blank == 1 {
            if let NodeValue::List(data) = doc.value_mut(node) {
                data.tight = false;
            }
            self.had_blank_line = false;
        }
        true
    }

    fn try_continue(&mut self, state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        if state.is_blank() {
            self.had_blank_line = true;
            self.lines_after_blank = 0;
        } else if self.had_blank_line {
            self.lines_after_blank += 1;
        }
        // lists have no markers of their own; items decide
        Some(BlockContinue::AtIndex(state.index()))
    }
}

#[derive(Debug)]
pub struct ItemParser {
    data: ItemData,
    had_blank_line: bool,
}

impl ItemParser {
    pub fn new(marker_indent: usize, content_indent: usize) -> Self {
        Self {
            data: ItemData {
                marker_indent,
                content_indent,
            },
            had_blank_line: false,
        }
    }
}

impl BlockParser for ItemParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::Item(self.data)
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&mut self, _child: &NodeValue, doc: &mut Document, node: NodeId) -> bool {
        if self.had_blank_line
            && let Some(parent) = doc.parent(node)
            && let NodeValue::List(data) = doc.value_mut(parent)
        {
            data.tight = false;
        }
        true
    }

    fn try_continue(&mut self, state: &BlockState<'_>, node: NodeId) -> Option<BlockContinue> {
        if state.is_blank() {
            // an item can begin with at most one blank line
            if state.document().first_child(node).is_none() {
                return None;
            }
            // blank lines inside code don't loosen the list
            self.had_blank_line = matches!(
                state.active_block(),
                NodeValue::Paragraph | NodeValue::Item(_)
            );
            return Some(BlockContinue::AtIndex(state.next_non_space_index()));
        }
        if state.indent() >= self.data.content_indent {
            Some(BlockContinue::AtColumn(state.column() + self.data.content_indent))
        } else {
            None
        }
    }
}

pub struct ListStart;

impl ListStart {
    /// Column at which the item's content starts, or `None` when the item may
    /// not interrupt a paragraph.
    fn content_column(
        state: &BlockState<'_>,
        kind: ListKind,
        marker_len: usize,
        in_paragraph: bool,
    ) -> Option<usize> {
        let line = state.line().as_bytes();
        let index_after_marker = state.next_non_space_index() + marker_len;
        let column_after_marker = state.column() + state.indent() + marker_len;

        let mut content_column = column_after_marker;
        let mut has_content = false;
        for &b in &line[index_after_marker.min(line.len())..] {
            match b {
                b'\t' => content_column += columns_to_next_tab_stop(content_column),
                b' ' => content_column += 1,
                _ => {
                    has_content = true;
                    break;
                }
            }
        }

        if in_paragraph {
            if matches!(kind, ListKind::Ordered { start, .. } if start != 1) {
                return None;
            }
            if !has_content {
                return None;
            }
        }

        // empty item or indented code after the marker: content is one
        // column past the marker
        if !has_content || content_column - column_after_marker > CODE_BLOCK_INDENT {
            content_column = column_after_marker + 1;
        }
        Some(content_column)
    }
}

impl BlockStartFactory for ListStart {
    fn name(&self) -> &'static str {
        "list"
    }

    fn try_start(&self, state: &BlockState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        if state.indent() >= CODE_BLOCK_INDENT {
            return None;
        }
        let (kind, marker_len) = ListMarker::parse(state.rest())?;
        let in_paragraph = !matched.paragraph_lines().is_empty();
        let content_column = Self::content_column(state, kind, marker_len, in_paragraph)?;

        let item = ItemParser::new(state.indent(), content_column - state.column());
        let continues_list = matches!(
            matched.value,
            NodeValue::List(data) if ListMarker::same_list(data.kind, kind)
        );
        let parsers: Vec<Box<dyn BlockParser>> = if continues_list {
            vec![Box::new(item)]
        } else {
            vec![Box::new(ListParser::new(kind)), Box::new(item)]
        };
        Some(BlockStart::of(parsers).at_column(content_column))
    }
}
