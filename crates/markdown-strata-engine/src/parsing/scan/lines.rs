use std::borrow::Cow;

use crate::parsing::text::REPLACEMENT;

/// A single logical line of input, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef<'a> {
    /// Zero-based line number.
    pub number: usize,
    /// Line text with NUL replaced by U+FFFD.
    pub text: Cow<'a, str>,
}

/// Splits input on `\n`, `\r\n` and `\r`.
///
/// A terminator at the very end does not produce an extra empty line, so
/// `"a\n"` and `"a"` both yield one line and `""` yields none.
pub fn lines(input: &str) -> Lines<'_> {
    Lines {
        input,
        pos: 0,
        number: 0,
    }
}

pub struct Lines<'a> {
    input: &'a str,
    pos: usize,
    number: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineRef<'a>;

    fn next(&mut self) -> Option<LineRef<'a>> {
        if self.pos >= self.input.len() {
            return None;
        }
        let rest = &self.input[self.pos..];
        let (line, consumed) = match rest.find(['\n', '\r']) {
            Some(end) => {
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                (&rest[..end], end + terminator)
            }
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        let number = self.number;
        self.number += 1;

        let text = if line.contains('\0') {
            Cow::Owned(line.replace('\0', &REPLACEMENT.to_string()))
        } else {
            Cow::Borrowed(line)
        };
        Some(LineRef { number, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        lines(input).map(|l| l.text.into_owned()).collect()
    }

    #[test]
    fn splits_on_all_terminators() {
        assert_eq!(texts("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn trailing_terminator_adds_no_line() {
        assert_eq!(texts("a\n"), vec!["a"]);
        assert_eq!(texts("a\r\n"), vec!["a"]);
        assert!(texts("").is_empty());
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(texts("\n\n"), vec!["", ""]);
        assert_eq!(texts("a\n\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn nul_is_replaced() {
        assert_eq!(texts("a\0b"), vec!["a\u{FFFD}b"]);
    }

    #[test]
    fn lines_are_numbered() {
        let numbers: Vec<_> = lines("x\ny\nz").map(|l| l.number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
    }
}
