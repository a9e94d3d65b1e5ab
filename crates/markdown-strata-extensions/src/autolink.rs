//! Turns bare URLs, `www.` hosts and e-mail addresses in text into links.
//!
//! Runs after inline parsing, so text inside links, images and code spans is
//! never touched. Any scheme followed by `://` counts as a URL. Trailing punctuation is left out of the link the way GitHub
//! does it: `.`, `,` and friends are dropped, and a closing `)` only stays when
//! it balances an opening one inside the URL.

use std::sync::OnceLock;

use log::debug;
use markdown_strata_engine::node::{Document, Link};
use markdown_strata_engine::{Extension, NodeId, NodeValue, ParserBuilder, PostProcessor, Visitor, walk};
use regex::Regex;

fn link_regex() -> &'static Regex {
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    LINK_REGEX.get_or_init(|| {
        Regex::new(
            r"[A-Za-z][A-Za-z0-9+.-]*://[^\s<]+|www\.[^\s<]+|[A-Za-z0-9._+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+",
        )
        .expect("Invalid autolink regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Url,
    Www,
    Email,
}

/// A link found in plain text, as a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSpan {
    pub start: usize,
    pub end: usize,
    pub kind: LinkKind,
}

impl LinkSpan {
    pub fn destination(&self, text: &str) -> String {
        let literal = &text[self.start..self.end];
        match self.kind {
            LinkKind::Url => literal.to_string(),
            LinkKind::Www => format!("http://{literal}"),
            LinkKind::Email => format!("mailto:{literal}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AutolinkExtension;

impl Extension for AutolinkExtension {
    fn name(&self) -> &'static str {
        "autolink"
    }

    fn extend_parser(&self, builder: &mut ParserBuilder) {
        builder.post_processor(AutolinkPostProcessor);
    }
}

struct AutolinkPostProcessor;

impl PostProcessor for AutolinkPostProcessor {
    fn process(&self, doc: &mut Document) {
        let mut collector = TextCollector::default();
        walk(&mut collector, doc, doc.root());

        let linked: usize = collector.texts.into_iter().map(|node| linkify(doc, node)).sum();
        if linked > 0 {
            debug!("Autolinked {linked} URLs and addresses");
        }
    }
}

/// Text nodes outside of links and images.
#[derive(Default)]
struct TextCollector {
    texts: Vec<NodeId>,
}

impl Visitor for TextCollector {
    fn visit_text(&mut self, _doc: &Document, node: NodeId, _literal: &str) {
        self.texts.push(node);
    }

    fn visit_link(&mut self, _doc: &Document, _node: NodeId, _link: &Link) {}

    fn visit_image(&mut self, _doc: &Document, _node: NodeId, _link: &Link) {}
}

/// Replaces a Text node with alternating Text and Link nodes. Returns the
/// number of links created.
fn linkify(doc: &mut Document, node: NodeId) -> usize {
    let Some(text) = doc.value(node).text() else {
        return 0;
    };
    let spans = find_links(text);
    if spans.is_empty() {
        return 0;
    }
    let text = text.to_string();

    let mut previous = node;
    let mut last = 0;
    for span in &spans {
        if span.start > last {
            let before = doc.create(NodeValue::Text(text[last..span.start].to_string()));
            doc.insert_after(previous, before);
            previous = before;
        }
        let link = doc.create(NodeValue::Link(Link {
            destination: span.destination(&text),
            title: None,
        }));
        doc.append_child(link, NodeValue::Text(text[span.start..span.end].to_string()));
        doc.insert_after(previous, link);
        previous = link;
        last = span.end;
    }
    if last < text.len() {
        let after = doc.create(NodeValue::Text(text[last..].to_string()));
        doc.insert_after(previous, after);
    }
    doc.detach(node);
    spans.len()
}

/// Every link in `text`, in order and without overlaps.
pub fn find_links(text: &str) -> Vec<LinkSpan> {
    let mut spans = Vec::new();
    for found in link_regex().find_iter(text) {
        let literal = found.as_str();
        let kind = if literal.starts_with("www.") {
            LinkKind::Www
        } else if literal.contains("://") {
            LinkKind::Url
        } else {
            LinkKind::Email
        };

        let start = found.start();
        if kind != LinkKind::Email
            && text[..start].chars().next_back().is_some_and(char::is_alphanumeric)
        {
            continue;
        }

        let end = match kind {
            LinkKind::Email => {
                if literal.ends_with(['-', '_']) {
                    continue;
                }
                found.end()
            }
            LinkKind::Url | LinkKind::Www => {
                let trimmed = trim_link_end(literal);
                let prefix = if kind == LinkKind::Www { "www.".len() } else { literal.find("://").map_or(0, |i| i + 3) };
                if trimmed.len() <= prefix {
                    continue;
                }
                start + trimmed.len()
            }
        };
        spans.push(LinkSpan { start, end, kind });
    }
    spans
}

fn trim_link_end(link: &str) -> &str {
    let mut link = link;
    while let Some(last) = link.chars().next_back() {
        match last {
            '?' | '!' | '.' | ',' | ':' | '*' | '_' | '~' | '\'' | '"' => link = &link[..link.len() - 1],
            ')' => {
                let opens = link.matches('(').count();
                let closes = link.matches(')').count();
                if closes <= opens {
                    break;
                }
                link = &link[..link.len() - 1];
            }
            ';' => {
                // `&name;` at the end looks like an entity and is not part of the link
                let body = &link[..link.len() - 1];
                link = match body.rfind('&') {
                    Some(amp)
                        if amp + 1 < body.len()
                            && body[amp + 1..].chars().all(|c| c.is_ascii_alphanumeric()) =>
                    {
                        &link[..amp]
                    }
                    _ => body,
                };
            }
            _ => break,
        }
    }
    link
}
