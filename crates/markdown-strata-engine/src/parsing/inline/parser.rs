use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use super::cursor::Cursor;
use super::delimiter::{Bracket, Delimiter};
use super::link::{parse_destination, parse_label, parse_title};
use super::{DelimiterProcessor, InlineSyntax};
use crate::error::{ContractViolation, ParseError, ResourceExhausted};
use crate::node::{Document, Link, NodeId, NodeValue};
use crate::parsing::text::{is_punctuation, is_whitespace};

/// Parses the raw text of one block at a time into inline nodes.
///
/// One `InlineParser` is shared by every block of a document; all per-block
/// state lives in the `InlineRun` created for each call to [`parse`](Self::parse).
pub struct InlineParser<'s> {
    syntax: &'s InlineSyntax,
    max_nesting_depth: Option<usize>,
}

impl<'s> InlineParser<'s> {
    pub fn new(syntax: &'s InlineSyntax) -> Self {
        Self {
            syntax,
            max_nesting_depth: None,
        }
    }

    /// Bounds how many inline levels may sit below one block.
    pub fn with_max_nesting_depth(mut self, limit: Option<usize>) -> Self {
        self.max_nesting_depth = limit;
        self
    }

    /// Parses `content` and appends the resulting inlines to `block`.
    pub fn parse(&mut self, content: &str, block: NodeId, doc: &mut Document) -> Result<(), ParseError> {
        InlineRun {
            syntax: self.syntax,
            max_nesting_depth: self.max_nesting_depth,
            cur: Cursor::new(content),
            doc,
            block,
            delimiters: Vec::new(),
            brackets: Vec::new(),
            trailing_spaces: 0,
            next_delimiter_id: 0,
        }
        .run()
    }
}

struct InlineRun<'a, 'd, 's> {
    syntax: &'s InlineSyntax,
    max_nesting_depth: Option<usize>,
    cur: Cursor<'a>,
    doc: &'d mut Document,
    block: NodeId,
    delimiters: Vec<Delimiter>,
    brackets: Vec<Bracket>,
    trailing_spaces: usize,
    next_delimiter_id: usize,
}

impl InlineRun<'_, '_, '_> {
    fn run(mut self) -> Result<(), ParseError> {
        while !self.cur.eof() {
            self.parse_inline()?;
        }
        self.process_delimiters(0)?;

        if let Some(limit) = self.max_nesting_depth
            && self.doc.depth_below(self.block) > limit
        {
            warn!("Inline nesting limit {limit} reached");
            return Err(ResourceExhausted::InlineNestingTooDeep { limit }.into());
        }

        self.doc.merge_adjacent_text(self.block);
        Ok(())
    }

    fn parse_inline(&mut self) -> Result<(), ParseError> {
        let Some(c) = self.cur.peek_char() else {
            return Ok(());
        };
        if c != '\n' {
            self.trailing_spaces = 0;
        }

        match c {
            '[' => {
                self.parse_open_bracket();
                return Ok(());
            }
            '!' => {
                self.parse_bang();
                return Ok(());
            }
            ']' => return self.parse_close_bracket(),
            '\n' => {
                self.parse_line_break();
                return Ok(());
            }
            _ => {}
        }

        let syntax = self.syntax;
        if !syntax.is_special(c) {
            self.parse_text();
            return Ok(());
        }

        let start = self.cur.pos();
        for parser in syntax.content_parsers(c) {
            if let Some(fragment) = parser.try_parse(&mut self.cur) {
                if self.cur.pos() <= start {
                    return Err(
                        ContractViolation::new(parser.name(), "inline parser consumed no input").into(),
                    );
                }
                self.doc.append_fragment(self.block, fragment);
                return Ok(());
            }
            self.cur.set_pos(start);
        }

        if let Some(processor) = syntax.delimiter_processor(c)
            && self.parse_delimiters(processor, c)
        {
            return Ok(());
        }

        self.parse_text();
        Ok(())
    }

    fn append_text(&mut self, text: &str) -> NodeId {
        self.doc.append_child(self.block, NodeValue::Text(text.to_string()))
    }

    /// Ordinary characters up to the next special one.
    fn parse_text(&mut self) {
        let start = self.cur.pos();
        self.cur.bump();
        while let Some(c) = self.cur.peek_char() {
            if self.syntax.is_special(c) {
                break;
            }
            self.cur.bump();
        }

        let mut text = self.cur.slice(start, self.cur.pos());
        match self.cur.peek() {
            Some(b'\n') => {
                // remembered for hard line breaks
                let trimmed = text.trim_end_matches(' ');
                self.trailing_spaces = text.len() - trimmed.len();
                text = trimmed;
            }
            None => text = text.trim_end_matches([' ', '\t']),
            Some(_) => {}
        }
        if !text.is_empty() {
            self.append_text(text);
        }
    }

    fn parse_line_break(&mut self) {
        self.cur.bump();
        let value = if self.trailing_spaces >= 2 {
            NodeValue::HardBreak
        } else {
            NodeValue::SoftBreak
        };
        self.trailing_spaces = 0;
        self.doc.append_child(self.block, value);
        // leading spaces on the next line are not content
        self.cur.match_multiple(b' ');
    }

    fn push_bracket(&mut self, node: NodeId, image: bool) {
        if let Some(last) = self.brackets.last_mut() {
            last.bracket_after = true;
        }
        self.brackets.push(Bracket {
            node,
            content_start: self.cur.pos(),
            image,
            allowed: true,
            bracket_after: false,
            prev_delimiter: self.delimiters.len(),
        });
    }

    fn parse_open_bracket(&mut self) {
        self.cur.bump();
        let node = self.append_text("[");
        self.push_bracket(node, false);
    }

    fn parse_bang(&mut self) {
        self.cur.bump();
        if self.cur.next_if(b'[') {
            let node = self.append_text("![");
            self.push_bracket(node, true);
        } else {
            self.append_text("!");
        }
    }

    fn parse_close_bracket(&mut self) -> Result<(), ParseError> {
        let before_close = self.cur.pos();
        self.cur.bump();
        let after_close = self.cur.pos();

        let Some(opener) = self.brackets.pop() else {
            self.append_text("]");
            return Ok(());
        };
        if !opener.allowed {
            self.append_text("]");
            return Ok(());
        }

        let target = match self.parse_inline_target(after_close) {
            Some(link) => Some(link),
            None => self.parse_reference_target(&opener, before_close, after_close),
        };
        let Some(link) = target else {
            self.cur.set_pos(after_close);
            self.append_text("]");
            return Ok(());
        };

        let value = if opener.image {
            NodeValue::Image(link)
        } else {
            NodeValue::Link(link)
        };
        let link_node = self.doc.create(value);
        let mut next = self.doc.next_sibling(opener.node);
        while let Some(node) = next {
            next = self.doc.next_sibling(node);
            self.doc.append(link_node, node);
        }

        // emphasis inside the link text
        self.process_delimiters(opener.prev_delimiter)?;
        self.doc.detach(opener.node);

        // no links inside links
        if !opener.image {
            for bracket in self.brackets.iter_mut().filter(|b| !b.image) {
                bracket.allowed = false;
            }
        }
        self.doc.append(self.block, link_node);
        Ok(())
    }

    /// `(destination "title")` right after the closing bracket.
    fn parse_inline_target(&mut self, after_close: usize) -> Option<Link> {
        if !self.cur.next_if(b'(') {
            return None;
        }
        self.cur.whitespace();
        let Some(destination) = parse_destination(&mut self.cur) else {
            self.cur.set_pos(after_close);
            return None;
        };
        // a title needs whitespace before it
        let mut title = None;
        if self.cur.whitespace() > 0 {
            title = parse_title(&mut self.cur);
            self.cur.whitespace();
        }
        if !self.cur.next_if(b')') {
            self.cur.set_pos(after_close);
            return None;
        }
        Some(Link { destination, title })
    }

    /// Full, collapsed or shortcut reference.
    fn parse_reference_target(
        &mut self,
        opener: &Bracket,
        before_close: usize,
        after_close: usize,
    ) -> Option<Link> {
        let label = parse_label(&mut self.cur);
        if label.is_none() {
            self.cur.set_pos(after_close);
        }
        let reference = match label {
            Some(label) if !label.is_empty() => label,
            // the bracket text is the label unless it holds another bracket
            _ if !opener.bracket_after => self.cur.slice(opener.content_start, before_close),
            _ => return None,
        };
        let definition = self.doc.references().resolve(reference)?;
        Some(Link {
            destination: definition.destination.clone(),
            title: definition.title.clone(),
        })
    }

    fn parse_delimiters(&mut self, processor: &Arc<dyn DelimiterProcessor>, c: char) -> bool {
        let start = self.cur.pos();
        let before = self.cur.prev_char();
        let mut count = 0;
        while self.cur.peek_char() == Some(c) {
            self.cur.bump();
            count += 1;
        }
        if count < processor.min_length() {
            self.cur.set_pos(start);
            return false;
        }
        let after = self.cur.peek_char();

        // start and end of text count as both whitespace and punctuation
        let before_ws = before.is_none_or(is_whitespace);
        let before_punct = before.is_none_or(is_punctuation);
        let after_ws = after.is_none_or(is_whitespace);
        let after_punct = after.is_none_or(is_punctuation);

        let left_flanking = !after_ws && (!after_punct || before_ws || before_punct);
        let right_flanking = !before_ws && (!before_punct || after_ws || after_punct);

        let (can_open, can_close) = if c == '_' {
            (
                left_flanking && (!right_flanking || before_punct),
                right_flanking && (!left_flanking || after_punct),
            )
        } else {
            (
                left_flanking && c == processor.opening_char(),
                right_flanking && c == processor.closing_char(),
            )
        };

        let nodes = (0..count)
            .map(|_| self.doc.append_child(self.block, NodeValue::Text(c.to_string())))
            .collect();
        self.delimiters.push(Delimiter {
            id: self.next_delimiter_id,
            ch: c,
            can_open,
            can_close,
            nodes,
            original_len: count,
        });
        self.next_delimiter_id += 1;
        true
    }

    /// Matches closers with openers above `bottom`, then drops every
    /// delimiter above `bottom`; unmatched ones stay as plain text.
    fn process_delimiters(&mut self, bottom: usize) -> Result<(), ParseError> {
        let syntax = self.syntax;
        // openers at or below this id were already searched for a char
        let mut openers_bottom: HashMap<char, usize> = HashMap::new();

        let mut closer = bottom;
        while closer < self.delimiters.len() {
            let ch = self.delimiters[closer].ch;
            let Some(processor) = syntax.delimiter_processor(ch) else {
                closer += 1;
                continue;
            };
            if !self.delimiters[closer].can_close {
                closer += 1;
                continue;
            }
            let opening_char = processor.opening_char();
            let floor = openers_bottom.get(&ch).copied();

            let mut used = 0;
            let mut opener = None;
            let mut potential_opener = false;
            let mut index = closer;
            while index > bottom {
                index -= 1;
                let candidate = &self.delimiters[index];
                if floor.is_some_and(|floor| candidate.id <= floor) {
                    break;
                }
                if candidate.can_open && candidate.ch == opening_char {
                    potential_opener = true;
                    used = processor.process(&candidate.run(), &self.delimiters[closer].run(), self.doc);
                    if used > 0 {
                        opener = Some(index);
                        break;
                    }
                }
            }

            let Some(opener) = opener else {
                // a rejected opener may still match a later closer, so the
                // floor only moves when there was no candidate at all
                if !potential_opener {
                    if let Some(previous) = closer.checked_sub(1) {
                        openers_bottom.insert(ch, self.delimiters[previous].id);
                    }
                    if !self.delimiters[closer].can_open {
                        self.delimiters.remove(closer);
                        continue;
                    }
                }
                closer += 1;
                continue;
            };

            let available = self.delimiters[opener]
                .nodes
                .len()
                .min(self.delimiters[closer].nodes.len());
            if used > available {
                return Err(ContractViolation::new(
                    processor.name(),
                    format!("used {used} delimiters but only {available} were available"),
                )
                .into());
            }

            let opener_nodes = &mut self.delimiters[opener].nodes;
            let removed: Vec<NodeId> = opener_nodes.drain(opener_nodes.len() - used..).collect();
            for node in removed {
                self.doc.detach(node);
            }
            let removed: Vec<NodeId> = self.delimiters[closer].nodes.drain(..used).collect();
            for node in removed {
                self.doc.detach(node);
            }

            // everything between the pair is now inside the new node
            self.delimiters.drain(opener + 1..closer);
            closer = opener + 1;

            if self.delimiters[opener].nodes.is_empty() {
                self.delimiters.remove(opener);
                closer -= 1;
            }
            if self.delimiters[closer].nodes.is_empty() {
                self.delimiters.remove(closer);
            }
        }

        self.delimiters.truncate(bottom);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::inline::kinds::{core_content_parsers, core_delimiter_processors};
    use pretty_assertions::assert_eq;

    fn syntax() -> InlineSyntax {
        InlineSyntax::new(&[], &core_content_parsers(), &core_delimiter_processors()).unwrap()
    }

    /// Compact S-expression of the inlines below `node`.
    fn sexp(doc: &Document, node: NodeId) -> String {
        doc.children(node)
            .map(|child| match doc.value(child) {
                NodeValue::Text(s) => format!("{s:?}"),
                NodeValue::Code(s) => format!("(code {s:?})"),
                NodeValue::SoftBreak => "soft".to_string(),
                NodeValue::HardBreak => "hard".to_string(),
                NodeValue::Emphasis(_) => format!("(em {})", sexp(doc, child)),
                NodeValue::Strong(_) => format!("(strong {})", sexp(doc, child)),
                NodeValue::Link(l) => format!("(link {} {})", l.destination, sexp(doc, child)),
                NodeValue::Image(l) => format!("(img {} {})", l.destination, sexp(doc, child)),
                NodeValue::HtmlInline(s) => format!("(html {s:?})"),
                other => format!("{:?}", other.kind()),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn inline(input: &str) -> String {
        inline_with(input, |_| {})
    }

    fn inline_with(input: &str, setup: impl FnOnce(&mut Document)) -> String {
        let syntax = syntax();
        let mut doc = Document::new();
        setup(&mut doc);
        let para = doc.append_child(doc.root(), NodeValue::Paragraph);
        InlineParser::new(&syntax).parse(input, para, &mut doc).unwrap();
        sexp(&doc, para)
    }

    #[test]
    fn emphasis_and_strong() {
        assert_eq!(inline("*foo*"), r#"(em "foo")"#);
        assert_eq!(inline("**foo**"), r#"(strong "foo")"#);
        assert_eq!(inline("***foo***"), r#"(em (strong "foo"))"#);
    }

    #[test]
    fn mixed_length_runs_follow_rule_of_three() {
        assert_eq!(inline("**a*b**"), r#"(strong "a*b")"#);
        assert_eq!(inline("*foo**bar**baz*"), r#"(em "foo" (strong "bar") "baz")"#);
        assert_eq!(inline("foo***bar***baz"), r#""foo" (em (strong "bar")) "baz""#);
    }

    #[test]
    fn intraword_underscore_is_literal() {
        assert_eq!(inline("foo_bar_"), r#""foo_bar_""#);
        assert_eq!(inline("_foo_bar"), r#""_foo_bar""#);
    }

    #[test]
    fn unmatched_delimiters_stay_text() {
        assert_eq!(inline("*foo"), r#""*foo""#);
        assert_eq!(inline("a * b *"), r#""a * b *""#);
    }

    #[test]
    fn inline_link_with_title() {
        assert_eq!(inline("[a *b*](/u \"t\")"), r#"(link /u "a " (em "b"))"#);
        assert_eq!(inline("[link](<>)"), r#"(link  "link")"#);
        assert_eq!(inline("[a](/u \"t)"), r#""[a](/u \"t)""#);
    }

    #[test]
    fn reference_links_resolve_against_definitions() {
        let define = |doc: &mut Document| {
            doc.references_mut().define("foo", "/url".into(), None);
        };
        assert_eq!(inline_with("[foo]", define), r#"(link /url "foo")"#);
        assert_eq!(inline_with("[Foo][]", define), r#"(link /url "Foo")"#);
        assert_eq!(inline_with("[x][FOO]", define), r#"(link /url "x")"#);
        assert_eq!(inline_with("[bar]", define), r#""[bar]""#);
    }

    #[test]
    fn links_do_not_nest_but_images_may_hold_links() {
        assert_eq!(
            inline("[foo [bar](/uri)](/uri)"),
            r#""[foo " (link /uri "bar") "](/uri)""#
        );
        assert_eq!(
            inline("![a [b](/l)](/img)"),
            r#"(img /img "a " (link /l "b"))"#
        );
    }

    #[test]
    fn line_breaks() {
        assert_eq!(inline("a  \nb"), r#""a" hard "b""#);
        assert_eq!(inline("a\nb"), r#""a" soft "b""#);
        assert_eq!(inline("a\\\nb"), r#""a" hard "b""#);
        assert_eq!(inline("a   "), r#""a""#);
    }

    #[test]
    fn code_span_binds_tighter_than_emphasis() {
        assert_eq!(inline("*a `*`*"), r#"(em "a " (code "*"))"#);
    }

    #[test]
    fn bang_without_bracket_is_text() {
        assert_eq!(inline("hi!"), r#""hi!""#);
    }
}
