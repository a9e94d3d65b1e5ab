//! Scanners for link labels, destinations and titles.
//!
//! Shared by the inline engine and the link reference definition parser. Each
//! `scan_*` leaves the cursor after what it matched and reports success; the
//! caller restores the position on failure.

use super::cursor::Cursor;
use crate::parsing::text::{is_escapable, unescape};

/// Labels longer than this are not labels.
pub const MAX_LABEL_LENGTH: usize = 999;

const MAX_NESTED_PARENS: usize = 32;

fn skip_escape(cur: &mut Cursor<'_>) {
    cur.bump();
    if cur.peek_char().is_some_and(is_escapable) {
        cur.bump();
    }
}

/// Scans label content up to (not including) `]`. Fails on an unescaped `[`.
pub fn scan_label_content(cur: &mut Cursor<'_>) -> bool {
    while let Some(b) = cur.peek() {
        match b {
            b'\\' => skip_escape(cur),
            b']' => return true,
            b'[' => return false,
            _ => {
                cur.bump();
            }
        }
    }
    true
}

pub fn scan_destination(cur: &mut Cursor<'_>) -> bool {
    if cur.eof() {
        return false;
    }
    if cur.next_if(b'<') {
        while let Some(b) = cur.peek() {
            match b {
                b'\\' => skip_escape(cur),
                b'\n' | b'<' => return false,
                b'>' => {
                    cur.bump();
                    return true;
                }
                _ => {
                    cur.bump();
                }
            }
        }
        return false;
    }
    scan_destination_with_balanced_parens(cur)
}

fn scan_destination_with_balanced_parens(cur: &mut Cursor<'_>) -> bool {
    let mut parens = 0usize;
    let mut empty = true;
    while let Some(c) = cur.peek_char() {
        match c {
            ' ' => return !empty,
            '\\' => skip_escape(cur),
            '(' => {
                parens += 1;
                if parens > MAX_NESTED_PARENS {
                    return false;
                }
                cur.bump();
            }
            ')' => {
                if parens == 0 {
                    return true;
                }
                parens -= 1;
                cur.bump();
            }
            c if c.is_control() => return !empty,
            _ => {
                cur.bump();
            }
        }
        empty = false;
    }
    true
}

pub fn scan_title(cur: &mut Cursor<'_>) -> bool {
    let end = match cur.peek() {
        Some(b'"') => b'"',
        Some(b'\'') => b'\'',
        Some(b'(') => b')',
        _ => return false,
    };
    cur.bump();
    if !scan_title_content(cur, end) {
        return false;
    }
    if cur.eof() {
        return false;
    }
    cur.bump();
    true
}

/// Scans title content up to (not including) `end`.
pub fn scan_title_content(cur: &mut Cursor<'_>, end: u8) -> bool {
    while let Some(b) = cur.peek() {
        if b == b'\\' {
            skip_escape(cur);
        } else if b == end {
            return true;
        } else if end == b')' && b == b'(' {
            return false;
        } else {
            cur.bump();
        }
    }
    true
}

/// Parses `<...>` or a bare destination, returning it unescaped.
pub fn parse_destination(cur: &mut Cursor<'_>) -> Option<String> {
    let pointy = cur.peek() == Some(b'<');
    let start = cur.pos();
    if !scan_destination(cur) {
        return None;
    }
    let raw = cur.slice(start, cur.pos());
    let raw = if pointy { &raw[1..raw.len() - 1] } else { raw };
    Some(unescape(raw).into_owned())
}

/// Parses a quoted or parenthesized title, returning it unescaped.
pub fn parse_title(cur: &mut Cursor<'_>) -> Option<String> {
    let start = cur.pos();
    if !scan_title(cur) {
        return None;
    }
    let raw = cur.slice(start, cur.pos());
    Some(unescape(&raw[1..raw.len() - 1]).into_owned())
}

/// Parses `[label]`, returning the raw label content.
pub fn parse_label<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    if !cur.next_if(b'[') {
        return None;
    }
    let start = cur.pos();
    if !scan_label_content(cur) {
        return None;
    }
    let end = cur.pos();
    if !cur.next_if(b']') {
        return None;
    }
    let content = cur.slice(start, end);
    if content.chars().count() > MAX_LABEL_LENGTH {
        return None;
    }
    Some(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(s: &str) -> Option<String> {
        parse_destination(&mut Cursor::new(s))
    }

    #[test]
    fn pointy_destination_allows_spaces() {
        assert_eq!(dest("</my uri>"), Some("/my uri".into()));
        assert_eq!(dest("<a\nb>"), None);
        assert_eq!(dest("<b)c>"), Some("b)c".into()));
    }

    #[test]
    fn bare_destination_balances_parens() {
        let mut cur = Cursor::new("foo(and(bar)))");
        assert!(scan_destination(&mut cur));
        assert_eq!(cur.rest(), ")");
    }

    #[test]
    fn bare_destination_stops_at_space() {
        let mut cur = Cursor::new("/url \"title\"");
        assert!(scan_destination(&mut cur));
        assert_eq!(cur.rest(), " \"title\"");
    }

    #[test]
    fn destination_unescapes() {
        assert_eq!(dest(r"foo\)\:"), Some("foo):".into()));
        assert_eq!(dest("foo%20b&auml;"), Some("foo%20bä".into()));
    }

    #[test]
    fn titles_in_three_styles() {
        assert_eq!(parse_title(&mut Cursor::new("\"a\"")), Some("a".into()));
        assert_eq!(parse_title(&mut Cursor::new("'a'")), Some("a".into()));
        assert_eq!(parse_title(&mut Cursor::new("(a)")), Some("a".into()));
        assert_eq!(parse_title(&mut Cursor::new("(a(b)")), None);
        assert_eq!(parse_title(&mut Cursor::new("\"unterminated")), None);
    }

    #[test]
    fn labels_reject_nested_brackets_and_overlong() {
        assert_eq!(parse_label(&mut Cursor::new("[foo]")), Some("foo"));
        assert_eq!(parse_label(&mut Cursor::new(r"[foo\]]")), Some(r"foo\]"));
        assert_eq!(parse_label(&mut Cursor::new("[a[b]]")), None);
        let long = format!("[{}]", "x".repeat(1000));
        assert_eq!(parse_label(&mut Cursor::new(&long)), None);
    }
}
