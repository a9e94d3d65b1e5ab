use std::sync::OnceLock;

use regex::Regex;

use crate::node::{Fragment, NodeValue};
use crate::parsing::html_patterns::{close_tag, open_tag};
use crate::parsing::inline::{Cursor, InlineContentParser};

fn html_regex() -> &'static Regex {
    static HTML: OnceLock<Regex> = OnceLock::new();
    HTML.get_or_init(|| {
        let pattern = format!(
            r"^(?:{}|{}|<!-->|<!--->|<!--[\s\S]*?-->|<[?][\s\S]*?[?]>|<![A-Za-z][^>]*>|<!\[CDATA\[[\s\S]*?\]\]>)",
            open_tag(),
            close_tag()
        );
        Regex::new(&pattern).expect("Invalid inline HTML regex")
    })
}

/// Raw HTML: tags, comments, processing instructions, declarations, CDATA.
pub struct HtmlInlineParser;

impl InlineContentParser for HtmlInlineParser {
    fn trigger_chars(&self) -> &[char] {
        &['<']
    }

    fn try_parse(&self, cur: &mut Cursor<'_>) -> Option<Fragment> {
        let found = html_regex().find(cur.rest())?;
        let html = found.as_str();
        cur.bump_n(found.end());
        Some(Fragment::leaf(NodeValue::HtmlInline(html.to_string())))
    }
}
