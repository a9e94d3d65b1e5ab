use crate::node::{Fragment, NodeValue};
use crate::parsing::inline::{Cursor, InlineContentParser};
use crate::parsing::text::is_escapable;

/// `\` before ASCII punctuation escapes it; before a line end it is a hard break.
pub struct BackslashParser;

impl InlineContentParser for BackslashParser {
    fn trigger_chars(&self) -> &[char] {
        &['\\']
    }

    fn try_parse(&self, cur: &mut Cursor<'_>) -> Option<Fragment> {
        cur.bump();
        match cur.peek_char() {
            Some('\n') => {
                cur.bump();
                Some(Fragment::leaf(NodeValue::HardBreak))
            }
            Some(c) if is_escapable(c) => {
                cur.bump();
                Some(Fragment::text(c))
            }
            _ => Some(Fragment::text("\\")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> (Option<Fragment>, usize) {
        let mut cur = Cursor::new(s);
        let fragment = BackslashParser.try_parse(&mut cur);
        (fragment, cur.pos())
    }

    #[test]
    fn escapes_punctuation() {
        let (fragment, pos) = parse("\\*x");
        assert!(matches!(fragment.map(|f| f.value), Some(NodeValue::Text(s)) if s == "*"));
        assert_eq!(pos, 2);
    }

    #[test]
    fn other_characters_keep_the_backslash() {
        let (fragment, pos) = parse("\\a");
        assert!(matches!(fragment.map(|f| f.value), Some(NodeValue::Text(s)) if s == "\\"));
        assert_eq!(pos, 1);
    }

    #[test]
    fn newline_is_hard_break() {
        let (fragment, _) = parse("\\\nnext");
        assert!(matches!(fragment.map(|f| f.value), Some(NodeValue::HardBreak)));
    }
}
