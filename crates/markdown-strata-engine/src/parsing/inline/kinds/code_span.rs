use crate::node::{Fragment, NodeValue};
use crate::parsing::inline::{Cursor, InlineContentParser};

/// Backtick code spans. An opening run without a closing run of the same
/// length is literal text.
pub struct CodeSpanParser;

impl CodeSpanParser {
    fn normalize(content: &str) -> String {
        let content = content.replace('\n', " ");
        let bytes = content.as_bytes();
        let strip = bytes.len() >= 3
            && bytes[0] == b' '
            && bytes[bytes.len() - 1] == b' '
            && bytes.iter().any(|&b| b != b' ');
        if strip {
            content[1..content.len() - 1].to_string()
        } else {
            content
        }
    }
}

impl InlineContentParser for CodeSpanParser {
    fn trigger_chars(&self) -> &[char] {
        &['`']
    }

    fn try_parse(&self, cur: &mut Cursor<'_>) -> Option<Fragment> {
        let start = cur.pos();
        let opening = cur.match_multiple(b'`');
        let after_opening = cur.pos();

        while cur.find(b'`').is_some() {
            let before_closing = cur.pos();
            if cur.match_multiple(b'`') == opening {
                let content = cur.slice(after_opening, before_closing);
                return Some(Fragment::leaf(NodeValue::Code(Self::normalize(content))));
            }
        }

        cur.set_pos(after_opening);
        Some(Fragment::text(cur.slice(start, after_opening)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("`foo`", "foo")]
    #[case("`` foo ` bar ``", "foo ` bar")]
    #[case("` `` `", "``")]
    #[case("`  ``  `", " `` ")]
    #[case("` a`", " a")]
    #[case("`  `", "  ")]
    #[case("``\nfoo\nbar  \nbaz\n``", "foo bar   baz")]
    fn code_content(#[case] input: &str, #[case] expected: &str) {
        let mut cur = Cursor::new(input);
        let fragment = CodeSpanParser.try_parse(&mut cur).unwrap();
        assert!(matches!(fragment.value, NodeValue::Code(ref s) if s == expected), "{fragment:?}");
        assert!(cur.eof());
    }

    #[test]
    fn unmatched_run_is_text() {
        let mut cur = Cursor::new("```foo``");
        let fragment = CodeSpanParser.try_parse(&mut cur).unwrap();
        assert!(matches!(fragment.value, NodeValue::Text(ref s) if s == "```"));
        assert_eq!(cur.pos(), 3);
    }
}
