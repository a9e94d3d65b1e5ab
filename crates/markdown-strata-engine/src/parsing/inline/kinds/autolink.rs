use std::sync::OnceLock;

use regex::Regex;

use crate::node::{Fragment, Link, NodeValue};
use crate::parsing::inline::{Cursor, InlineContentParser};

fn uri_regex() -> &'static Regex {
    static URI: OnceLock<Regex> = OnceLock::new();
    URI.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9.+-]{1,31}:[^<>\x00-\x20]*$").expect("Invalid URI regex")
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("Invalid email regex")
    })
}

/// `<scheme:...>` and `<user@host>`.
pub struct AutolinkParser;

impl AutolinkParser {
    fn link(destination: String, text: &str) -> Fragment {
        Fragment::with_children(
            NodeValue::Link(Link {
                destination,
                title: None,
            }),
            vec![Fragment::text(text)],
        )
    }
}

impl InlineContentParser for AutolinkParser {
    fn trigger_chars(&self) -> &[char] {
        &['<']
    }

    fn try_parse(&self, cur: &mut Cursor<'_>) -> Option<Fragment> {
        cur.bump();
        let start = cur.pos();
        cur.find(b'>')?;
        let content = cur.slice(start, cur.pos());
        if content.is_empty() {
            return None;
        }
        cur.bump();

        if uri_regex().is_match(content) {
            Some(Self::link(content.to_string(), content))
        } else if email_regex().is_match(content) {
            Some(Self::link(format!("mailto:{content}"), content))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn destination(input: &str) -> Option<String> {
        match AutolinkParser.try_parse(&mut Cursor::new(input))?.value {
            NodeValue::Link(link) => Some(link.destination),
            _ => None,
        }
    }

    #[rstest]
    #[case("<http://foo.bar.baz>", Some("http://foo.bar.baz"))]
    #[case("<MAILTO:FOO@BAR.BAZ>", Some("MAILTO:FOO@BAR.BAZ"))]
    #[case("<a+b+c:d>", Some("a+b+c:d"))]
    #[case("<foo@bar.example.com>", Some("mailto:foo@bar.example.com"))]
    #[case("<http://foo.bar/baz bim>", None)]
    #[case("<m:abc>", None)]
    #[case("<foo.bar.baz>", None)]
    #[case("<>", None)]
    fn autolinks(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(destination(input).as_deref(), expected);
    }
}
