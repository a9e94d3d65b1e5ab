//! Character classes and string helpers shared by the block and inline engines.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use unicode_categories::UnicodeCategories;

/// Replacement for NUL and invalid numeric character references.
pub const REPLACEMENT: char = '\u{FFFD}';

/// Characters that may be backslash-escaped: all of ASCII punctuation.
pub fn is_escapable(c: char) -> bool {
    c.is_ascii_punctuation()
}

/// Unicode punctuation: general categories P and S.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || c.is_punctuation() || c.is_symbol()
}

/// Unicode whitespace: category Zs plus tab, line feed, form feed and carriage return.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\u{000C}' | '\r') || c.is_separator_space()
}

pub fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// True if `s` has a character other than space or tab.
pub fn has_non_space(s: &str) -> bool {
    s.chars().any(|c| !is_space_or_tab(c))
}

fn named_entities() -> &'static HashMap<&'static str, &'static str> {
    static NAMED: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    NAMED.get_or_init(|| {
        entities::ENTITIES
            .iter()
            .filter(|e| e.entity.ends_with(';'))
            .map(|e| (e.entity, e.characters))
            .collect()
    })
}

/// Decodes a complete reference such as `&amp;`, `&#35;` or `&#x22;`.
///
/// Numeric references to NUL, surrogates or out-of-range code points decode to
/// U+FFFD. Unknown names return `None`.
pub fn decode_entity(entity: &str) -> Option<String> {
    let body = entity.strip_prefix('&')?.strip_suffix(';')?;
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        let c = match code {
            0 => REPLACEMENT,
            code => char::from_u32(code).unwrap_or(REPLACEMENT),
        };
        return Some(c.to_string());
    }
    named_entities().get(entity).map(|s| (*s).to_string())
}

fn escape_or_entity() -> &'static Regex {
    static ESCAPE_OR_ENTITY: OnceLock<Regex> = OnceLock::new();
    ESCAPE_OR_ENTITY.get_or_init(|| {
        Regex::new(r"\\[!-/:-@\[-`{-~]|&(?:#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[A-Za-z][A-Za-z0-9]{1,31});")
            .expect("Invalid escape regex")
    })
}

/// Resolves backslash escapes and character references, as done for link
/// destinations, titles and info strings.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains(['\\', '&']) {
        return Cow::Borrowed(s);
    }
    escape_or_entity().replace_all(s, |caps: &Captures<'_>| {
        let m = &caps[0];
        match m.strip_prefix('\\') {
            Some(escaped) => escaped.to_string(),
            None => decode_entity(m).unwrap_or_else(|| m.to_string()),
        }
    })
}

/// Normalizes a link label: trim, case-fold, collapse internal whitespace.
pub fn normalize_label(label: &str) -> String {
    let folded = label.trim().to_lowercase().to_uppercase();
    let mut out = String::with_capacity(folded.len());
    let mut in_space = false;
    for c in folded.chars() {
        if is_whitespace(c) {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('!', true)]
    #[case('~', true)]
    #[case('\u{00A7}', true)] // section sign, Po
    #[case('\u{20AC}', true)] // euro sign, Sc
    #[case('a', false)]
    #[case(' ', false)]
    fn punctuation_classes(#[case] c: char, #[case] expected: bool) {
        assert_eq!(is_punctuation(c), expected);
    }

    #[rstest]
    #[case('\u{00A0}', true)]
    #[case('\u{3000}', true)]
    #[case('\t', true)]
    #[case('\u{000B}', false)]
    #[case('x', false)]
    fn whitespace_classes(#[case] c: char, #[case] expected: bool) {
        assert_eq!(is_whitespace(c), expected);
    }

    #[rstest]
    #[case("&amp;", Some("&"))]
    #[case("&copy;", Some("\u{00A9}"))]
    #[case("&#35;", Some("#"))]
    #[case("&#X22;", Some("\""))]
    #[case("&#0;", Some("\u{FFFD}"))]
    #[case("&#xD800;", Some("\u{FFFD}"))]
    #[case("&nosuchentity;", None)]
    fn entities_decode(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(decode_entity(input).as_deref(), expected);
    }

    #[test]
    fn unescape_handles_escapes_and_entities() {
        assert_eq!(unescape(r"foo\*bar"), "foo*bar");
        assert_eq!(unescape(r"a\b"), r"a\b");
        assert_eq!(unescape("f&ouml;&ouml;"), "föö");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape(r"\&amp;"), "&amp;");
        assert!(matches!(unescape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn labels_fold_case_and_whitespace() {
        assert_eq!(normalize_label("  Foo \n  Bar "), "FOO BAR");
        assert_eq!(normalize_label("\u{1E9E}"), normalize_label("SS"));
        assert_eq!(normalize_label("ǅ"), normalize_label("ǆ"));
    }
}
