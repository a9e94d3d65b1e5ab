//! Canonical Markdown output.
//!
//! The output is not meant to look like the input. It is meant to parse back
//! into the same tree: every ASCII punctuation character in text is escaped,
//! code is always fenced, and links always use the inline form.

use crate::node::{CodeBlock, Document, Link, ListKind, NodeId, NodeValue};
use crate::parsing::text::is_escapable;

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, doc: &Document) -> String {
        let mut writer = MarkdownWriter::default();
        writer.blocks(doc, doc.root(), false);
        let mut out = writer.out;
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Where the next inline write lands relative to the line it is on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum LineStart {
    #[default]
    No,
    /// First content of a paragraph or heading.
    Block,
    /// First content after a soft or hard break.
    Break,
}

/// Writes lines under a stack of container prefixes (`> `, item indents).
#[derive(Default)]
struct MarkdownWriter {
    out: String,
    prefixes: Vec<String>,
    at_line_start: bool,
    line_start: LineStart,
}

impl MarkdownWriter {
    fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if self.at_line_start || self.out.is_empty() {
            for prefix in &self.prefixes {
                self.out.push_str(prefix);
            }
            self.at_line_start = false;
        }
        self.out.push_str(s);
        self.line_start = LineStart::No;
    }

    /// A continuation line indented past the HTML block threshold. Indented
    /// code cannot interrupt a paragraph, so the line stays inline content.
    fn continuation_indent(&mut self) {
        self.write("    ");
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    /// An empty line inside the current containers.
    fn blank_line(&mut self) {
        let prefix: String = self.prefixes.concat();
        self.out.push_str(prefix.trim_end());
        self.newline();
    }

    fn blocks(&mut self, doc: &Document, parent: NodeId, tight: bool) {
        for (i, child) in doc.children(parent).enumerate() {
            if i > 0 {
                self.newline();
                if !tight {
                    self.blank_line();
                }
            }
            self.block(doc, child, tight);
        }
    }

    fn block(&mut self, doc: &Document, node: NodeId, tight: bool) {
        match doc.value(node) {
            NodeValue::Paragraph => {
                self.line_start = LineStart::Block;
                self.inlines(doc, node);
            }
            NodeValue::Heading(heading) => {
                let multiline = doc.descendants(node).any(|d| match doc.value(d) {
                    NodeValue::SoftBreak | NodeValue::HardBreak => true,
                    NodeValue::HtmlInline(literal) => literal.contains('\n'),
                    _ => false,
                });
                if multiline && heading.level <= 2 {
                    self.line_start = LineStart::Block;
                    self.inlines(doc, node);
                    self.newline();
                    self.write(if heading.level == 1 { "===" } else { "---" });
                } else {
                    self.write(&"#".repeat(usize::from(heading.level)));
                    if doc.first_child(node).is_some() {
                        self.write(" ");
                        self.line_start = LineStart::Block;
                        self.inlines(doc, node);
                    }
                }
            }
            NodeValue::ThematicBreak => self.write("***"),
            NodeValue::CodeBlock(code) => self.code_block(code),
            NodeValue::HtmlBlock(literal) => self.literal_lines(literal),
            NodeValue::BlockQuote => {
                self.write(">");
                self.prefixes.push("> ".to_string());
                if doc.first_child(node).is_some() {
                    self.write(" ");
                    self.blocks(doc, node, false);
                }
                self.prefixes.pop();
            }
            NodeValue::List(list) => self.list(doc, node, list.kind, list.tight),
            _ => self.blocks(doc, node, tight),
        }
    }

    fn list(&mut self, doc: &Document, node: NodeId, kind: ListKind, tight: bool) {
        for (i, item) in doc.children(node).enumerate() {
            if i > 0 {
                self.newline();
                if !tight {
                    self.blank_line();
                }
            }
            let marker = match kind {
                ListKind::Bullet { marker } => marker.to_string(),
                ListKind::Ordered { start, delimiter } => {
                    let number = u64::from(start) + i as u64;
                    format!("{number}{delimiter}")
                }
            };
            self.write(&marker);
            let indent = " ".repeat(marker.len() + 1);
            if doc.first_child(item).is_some() {
                self.write(" ");
                self.prefixes.push(indent);
                self.blocks(doc, item, tight);
                self.prefixes.pop();
            }
        }
    }

    fn code_block(&mut self, code: &CodeBlock) {
        let (fence_char, longest) = if code.info.contains('`') {
            ('~', longest_run(&code.literal, '~'))
        } else {
            ('`', longest_run(&code.literal, '`'))
        };
        let fence = fence_char.to_string().repeat(longest.max(2) + 1);
        self.write(&fence);
        self.write(&code.info);
        self.newline();
        self.literal_lines(code.literal.strip_suffix('\n').unwrap_or(&code.literal));
        if !code.literal.is_empty() {
            self.newline();
        }
        self.write(&fence);
    }

    /// Raw lines; empty ones only get the trimmed prefix.
    fn literal_lines(&mut self, literal: &str) {
        if literal.is_empty() {
            return;
        }
        for (i, line) in literal.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            if line.is_empty() {
                let prefix: String = self.prefixes.concat();
                self.out.push_str(prefix.trim_end());
                self.at_line_start = false;
            } else {
                self.write(line);
            }
        }
    }

    fn inlines(&mut self, doc: &Document, parent: NodeId) {
        for child in doc.children(parent) {
            self.inline(doc, child);
        }
    }

    fn inline(&mut self, doc: &Document, node: NodeId) {
        match doc.value(node) {
            NodeValue::Text(text) => {
                // Spaces at the edge of a line or inside a delimiter run
                // would be stripped or change flanking on reparse.
                let leading = self.line_start != LineStart::No
                    || (doc.previous_sibling(node).is_none()
                        && doc.parent(node).is_some_and(|p| {
                            matches!(doc.value(p), NodeValue::Emphasis(_) | NodeValue::Strong(_))
                        }));
                let trailing = doc.next_sibling(node).is_none_or(|next| {
                    matches!(doc.value(next), NodeValue::SoftBreak | NodeValue::HardBreak)
                });
                self.write(&protect_spaces(&escape_text(text), leading, trailing));
            }
            NodeValue::SoftBreak => {
                self.newline();
                self.line_start = LineStart::Break;
            }
            NodeValue::HardBreak => {
                self.write("\\");
                self.newline();
                self.line_start = LineStart::Break;
            }
            NodeValue::Code(literal) => self.write(&code_span(literal)),
            NodeValue::HtmlInline(literal) => {
                for (i, line) in literal.split('\n').enumerate() {
                    if i > 0 {
                        self.newline();
                    }
                    if i > 0 || self.line_start == LineStart::Break {
                        self.continuation_indent();
                    }
                    self.write(line);
                }
            }
            NodeValue::Emphasis(c) => {
                let marker = c.to_string();
                self.write(&marker);
                self.inlines(doc, node);
                self.write(&marker);
            }
            NodeValue::Strong(c) => {
                let marker = c.to_string().repeat(2);
                self.write(&marker);
                self.inlines(doc, node);
                self.write(&marker);
            }
            NodeValue::Link(link) => {
                self.write("[");
                self.inlines(doc, node);
                self.write(&link_target(link));
            }
            NodeValue::Image(link) => {
                self.write("![");
                self.inlines(doc, node);
                self.write(&link_target(link));
            }
            _ => self.inlines(doc, node),
        }
    }
}

/// Backslash-escapes punctuation. Line breaks and tabs only reach text
/// through character references, so they go back out as references.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => {
                if is_escapable(c) {
                    out.push('\\');
                }
                out.push(c);
            }
        }
    }
    out
}

/// Turns the outer spaces of already escaped text into `&#32;`.
fn protect_spaces(escaped: &str, leading: bool, trailing: bool) -> String {
    let mut body = escaped;
    let mut head = 0;
    let mut tail = 0;
    if trailing {
        let kept = body.trim_end_matches(' ');
        tail = body.len() - kept.len();
        body = kept;
    }
    if leading {
        let kept = body.trim_start_matches(' ');
        head = body.len() - kept.len();
        body = kept;
    }
    if head == 0 && tail == 0 {
        return escaped.to_string();
    }
    format!("{}{body}{}", "&#32;".repeat(head), "&#32;".repeat(tail))
}

fn code_span(literal: &str) -> String {
    let ticks = "`".repeat(longest_run(literal, '`') + 1);
    let pad = literal.starts_with('`')
        || literal.ends_with('`')
        || (literal.starts_with(' ') && literal.ends_with(' ') && literal.trim() != "");
    if pad {
        format!("{ticks} {literal} {ticks}")
    } else {
        format!("{ticks}{literal}{ticks}")
    }
}

fn link_target(link: &Link) -> String {
    let mut out = String::from("](<");
    for c in link.destination.chars() {
        if matches!(c, '<' | '>' | '\\' | '&') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('>');
    if let Some(title) = &link.title {
        out.push_str(" \"");
        for c in title.chars() {
            match c {
                '\n' => out.push_str("&#10;"),
                '\r' => out.push_str("&#13;"),
                c => {
                    if matches!(c, '"' | '\\' | '&') {
                        out.push('\\');
                    }
                    out.push(c);
                }
            }
        }
        out.push('"');
    }
    out.push(')');
    out
}

fn longest_run(s: &str, c: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in s.chars() {
        if ch == c {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Parser;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn markdown(input: &str) -> String {
        MarkdownRenderer::new().render(&Parser::commonmark().parse(input).unwrap())
    }

    #[rstest]
    #[case("Foo *bar*\n", "Foo *bar*\n")]
    #[case("# a.b\n", "# a\\.b\n")]
    #[case("Foo\nbar\n===\n", "Foo\nbar\n===\n")]
    #[case("    code\n", "```\ncode\n```\n")]
    #[case("> a\n> b\n", "> a\n> b\n")]
    #[case("- a\n- b\n", "- a\n- b\n")]
    #[case("1. a\n\n2. b\n", "1. a\n\n2. b\n")]
    #[case("[x](/u \"t\")\n", "[x](</u> \"t\")\n")]
    #[case("`` a`b ``\n", "``a`b``\n")]
    #[case("a\\\nb\n", "a\\\nb\n")]
    #[case("Foo *bar\nbaz*\n====\n", "Foo *bar\nbaz*\n===\n")]
    #[case("a\n    <div> b\n", "a\n    <div> b\n")]
    #[case("&#9;foo\n", "&#9;foo\n")]
    #[case("foo&#10;&#10;bar\n", "foo&#10;&#10;bar\n")]
    #[case("&#32;a&#32;\nb\n", "&#32;a&#32;\nb\n")]
    #[case("*&#32;a*\n", "*&#32;a*\n")]
    #[case("[a](/u?x&y \"t&#10;&\")\n", "[a](</u?x\\&y> \"t&#10;\\&\")\n")]
    fn canonical_output(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(markdown(input), expected);
    }

    #[test]
    fn nested_containers_carry_prefixes() {
        assert_eq!(
            markdown("> - a\n>   b\n>\n>   c\n"),
            "> - a\n>   b\n>\n>   c\n"
        );
    }

    #[test]
    fn html_spanning_lines_keeps_container_prefixes() {
        assert_eq!(
            markdown("> a <!-- b\n> c -->\n"),
            "> a <!-- b\n>     c -->\n"
        );
    }

    #[test]
    fn fence_outgrows_backtick_runs() {
        assert_eq!(markdown("~~~\n````\n~~~\n"), "`````\n````\n`````\n");
    }
}
