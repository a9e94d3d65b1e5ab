//! GFM tables.
//!
//! A table starts when a single-line paragraph containing `|` is followed by
//! a delimiter row such as `| --- | :-: |`. Body rows follow until a blank
//! line or the start of another block; a row that is only a `|` ends the
//! table as well.

use log::trace;
use markdown_strata_engine::error::ParseError;
use markdown_strata_engine::node::Document;
use markdown_strata_engine::parsing::blocks::{BlockContinue, BlockState, MatchedBlock};
use markdown_strata_engine::parsing::inline::InlineParser;
use markdown_strata_engine::render::{Attributes, HtmlContext, HtmlNodeRenderer};
use markdown_strata_engine::{
    BlockParser, BlockStart, BlockStartFactory, CustomNode, Extension, HtmlRendererBuilder, NodeId,
    NodeValue, ParserBuilder, Placement,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCell {
    pub header: bool,
    pub alignment: Option<Alignment>,
}

macro_rules! table_node {
    ($ty:ty, $name:literal) => {
        impl CustomNode for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn is_block(&self) -> bool {
                true
            }
        }
    };
}

table_node!(TableBlock, "table_block");
table_node!(TableHead, "table_head");
table_node!(TableBody, "table_body");
table_node!(TableRow, "table_row");
table_node!(TableCell, "table_cell");

#[derive(Debug, Clone, Copy, Default)]
pub struct TablesExtension;

impl Extension for TablesExtension {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn extend_parser(&self, builder: &mut ParserBuilder) {
        // a delimiter row like `- | -` would otherwise open a list
        builder.block_start(TableStart, Placement::before("list"));
    }

    fn extend_html(&self, builder: &mut HtmlRendererBuilder) {
        for (node, tag) in [
            ("table_block", "table"),
            ("table_head", "thead"),
            ("table_body", "tbody"),
            ("table_row", "tr"),
        ] {
            builder.node_renderer(TableSectionHtmlRenderer { node, tag });
        }
        builder.node_renderer(TableCellHtmlRenderer);
    }
}

struct TableStart;

impl BlockStartFactory for TableStart {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn try_start(&self, state: &BlockState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        let [header] = matched.paragraph_lines() else {
            return None;
        };
        if !header.contains('|') {
            return None;
        }
        let columns = parse_delimiter_row(&state.line()[state.index()..])?;
        if columns.len() < split_row(header).len() {
            return None;
        }
        trace!("Table with {} columns at line {}", columns.len(), state.line_number() + 1);
        Some(
            BlockStart::single(TableParser::new(header.clone(), columns))
                .at_index(state.index())
                .replace_active_block(),
        )
    }
}

struct TableParser {
    header: String,
    columns: Vec<Option<Alignment>>,
    rows: Vec<String>,
    lazy: bool,
}

impl TableParser {
    fn new(header: String, columns: Vec<Option<Alignment>>) -> Self {
        Self {
            header,
            columns,
            rows: Vec::new(),
            lazy: true,
        }
    }

    fn parse_row(
        &self,
        line: &str,
        header: bool,
        width: usize,
        row: NodeId,
        doc: &mut Document,
        inlines: &mut InlineParser<'_>,
    ) -> Result<(), ParseError> {
        let cells = split_row(line);
        for column in 0..width {
            let alignment = self.columns.get(column).copied().flatten();
            let cell = doc.append_child(row, NodeValue::custom(TableCell { header, alignment }));
            // body rows never grow past the header
            let content = cells.get(column).map(|c| c.trim()).unwrap_or_default();
            inlines.parse(content, cell, doc)?;
        }
        Ok(())
    }
}

impl BlockParser for TableParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::custom(TableBlock)
    }

    fn can_have_lazy_continuation_lines(&self) -> bool {
        self.lazy
    }

    fn try_continue(&mut self, state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        let line = state.line();
        let start = state.next_non_space_index();
        let pipe = line[start..].find('|')? + start;
        if pipe == start && line[pipe + 1..].trim_matches([' ', '\t']).is_empty() {
            // a lone `|` ends the table and must not sneak back in lazily
            self.lazy = false;
            return None;
        }
        Some(BlockContinue::AtIndex(state.index()))
    }

    fn add_line(&mut self, line: &str) {
        self.rows.push(line.to_string());
    }

    fn parse_inlines(
        &mut self,
        node: NodeId,
        doc: &mut Document,
        inlines: &mut InlineParser<'_>,
    ) -> Result<(), ParseError> {
        let width = split_row(&self.header).len();

        let head = doc.append_child(node, NodeValue::custom(TableHead));
        let row = doc.append_child(head, NodeValue::custom(TableRow));
        self.parse_row(&self.header, true, width, row, doc, inlines)?;

        if self.rows.is_empty() {
            return Ok(());
        }
        let body = doc.append_child(node, NodeValue::custom(TableBody));
        for line in &self.rows {
            let row = doc.append_child(body, NodeValue::custom(TableRow));
            self.parse_row(line, false, width, row, doc, inlines)?;
        }
        Ok(())
    }
}

/// Alignment per column, or `None` when the line is not a delimiter row.
///
/// At least one pipe is required, even for a single column; pipes may not be
/// doubled and every column needs at least one `-`.
fn parse_delimiter_row(line: &str) -> Option<Vec<Option<Alignment>>> {
    let bytes = line.as_bytes();
    let mut columns = Vec::new();
    let mut pipes = 0;
    let mut has_pipe = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'|' => {
                i += 1;
                pipes += 1;
                if pipes > 1 {
                    return None;
                }
                has_pipe = true;
            }
            b'-' | b':' => {
                if pipes == 0 && !columns.is_empty() {
                    return None;
                }
                let left = bytes[i] == b':';
                if left {
                    i += 1;
                }
                let dashes = bytes[i..].iter().take_while(|&&b| b == b'-').count();
                if dashes == 0 {
                    return None;
                }
                i += dashes;
                let right = bytes.get(i) == Some(&b':');
                if right {
                    i += 1;
                }
                columns.push(match (left, right) {
                    (true, true) => Some(Alignment::Center),
                    (true, false) => Some(Alignment::Left),
                    (false, true) => Some(Alignment::Right),
                    (false, false) => None,
                });
                pipes = 0;
            }
            b' ' | b'\t' => i += 1,
            _ => return None,
        }
    }
    (has_pipe && !columns.is_empty()).then_some(columns)
}

/// Cell contents of a row. Leading and trailing pipes are optional and `\|`
/// is a literal pipe inside a cell.
fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim_matches([' ', '\t']);
    let row = trimmed.strip_prefix('|').unwrap_or(trimmed);

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }
    if !cell.is_empty() {
        cells.push(cell);
    }
    cells
}

/// `table`, `thead`, `tbody` and `tr` all render the same way.
struct TableSectionHtmlRenderer {
    node: &'static str,
    tag: &'static str,
}

impl HtmlNodeRenderer for TableSectionHtmlRenderer {
    fn node_name(&self) -> &'static str {
        self.node
    }

    fn render(&self, ctx: &mut HtmlContext<'_>, node: NodeId) {
        let attributes = ctx.extend_attributes(node, self.tag, Attributes::new());
        ctx.writer().line();
        ctx.writer().tag(self.tag, &attributes);
        ctx.writer().line();
        ctx.render_children(node);
        ctx.writer().line();
        ctx.writer().close_tag(self.tag);
        ctx.writer().line();
    }
}

struct TableCellHtmlRenderer;

impl HtmlNodeRenderer for TableCellHtmlRenderer {
    fn node_name(&self) -> &'static str {
        "table_cell"
    }

    fn render(&self, ctx: &mut HtmlContext<'_>, node: NodeId) {
        let Some(cell) = ctx.document().value(node).as_custom::<TableCell>().copied() else {
            return;
        };
        let tag = if cell.header { "th" } else { "td" };
        let mut attributes = Attributes::new();
        if let Some(alignment) = cell.alignment {
            attributes.push(("align".to_string(), alignment.as_str().to_string()));
        }
        let attributes = ctx.extend_attributes(node, tag, attributes);
        ctx.writer().line();
        ctx.writer().tag(tag, &attributes);
        ctx.render_children(node);
        ctx.writer().close_tag(tag);
        ctx.writer().line();
    }
}
