/// A cursor for character-by-character inline parsing with position tracking.
///
/// Positions are byte offsets into `s`. Callers only ever set a position they
/// previously read from [`Cursor::pos`], so the index stays on a char boundary.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn set_pos(&mut self, i: usize) {
        self.i = i;
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s.get(self.i..)?.chars().next()
    }

    /// The character just before the current position.
    pub fn prev_char(&self) -> Option<char> {
        self.s.get(..self.i)?.chars().next_back()
    }

    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes().get(self.i..).is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances past one whole character, returning it.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Consumes `b` if it is the current byte.
    pub fn next_if(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    /// Consumes ASCII bytes while `pred` holds, returning how many.
    pub fn match_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.i;
        while let Some(b) = self.peek() {
            if !b.is_ascii() || !pred(b) {
                break;
            }
            self.i += 1;
        }
        self.i - start
    }

    pub fn match_multiple(&mut self, b: u8) -> usize {
        self.match_while(|c| c == b)
    }

    /// Skips spaces, tabs, line endings, vertical tab and form feed.
    pub fn whitespace(&mut self) -> usize {
        self.match_while(|c| matches!(c, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r'))
    }

    /// Moves to the next occurrence of `b`, returning how many bytes were
    /// skipped. Without a match the cursor ends at EOF.
    pub fn find(&mut self, b: u8) -> Option<usize> {
        let rest = &self.s.as_bytes()[self.i.min(self.s.len())..];
        match rest.iter().position(|&c| c == b) {
            Some(offset) => {
                self.i += offset;
                Some(offset)
            }
            None => {
                self.i = self.s.len();
                None
            }
        }
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.s[start..end]
    }

    pub fn rest(&self) -> &'a str {
        &self.s[self.i.min(self.s.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'h'));
        assert_eq!(cur.bump(), Some('h'));
        assert_eq!(cur.pos(), 1);
    }

    #[test]
    fn cursor_starts_with() {
        let cur = Cursor::new("![alt]");
        assert!(cur.starts_with(b"!["));
        assert!(!cur.starts_with(b"]]"));
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.peek_char(), None);
        assert_eq!(cur.prev_char(), None);
    }

    #[test]
    fn bump_steps_over_multibyte_chars() {
        let mut cur = Cursor::new("éa");
        assert_eq!(cur.bump(), Some('é'));
        assert_eq!(cur.pos(), 2);
        assert_eq!(cur.prev_char(), Some('é'));
        assert_eq!(cur.peek_char(), Some('a'));
    }

    #[test]
    fn starts_with_pattern_longer_than_remaining() {
        let mut cur = Cursor::new("ab");
        assert!(!cur.starts_with(b"abcdef"));
        cur.bump();
        assert!(!cur.starts_with(b"bc"));
        assert!(cur.starts_with(b"b"));
    }

    #[test]
    fn starts_with_at_eof() {
        let mut cur = Cursor::new("ab");
        cur.bump_n(2);
        assert!(cur.eof());
        assert!(cur.starts_with(b""));
        assert!(!cur.starts_with(b"a"));
    }

    #[test]
    fn match_multiple_counts_run() {
        let mut cur = Cursor::new("```x");
        assert_eq!(cur.match_multiple(b'`'), 3);
        assert_eq!(cur.peek(), Some(b'x'));
        assert_eq!(cur.match_multiple(b'`'), 0);
    }

    #[test]
    fn whitespace_includes_newlines() {
        let mut cur = Cursor::new(" \n\tx");
        assert_eq!(cur.whitespace(), 3);
        assert_eq!(cur.peek(), Some(b'x'));
    }

    #[test]
    fn find_moves_to_match_or_eof() {
        let mut cur = Cursor::new("ab>c");
        assert_eq!(cur.find(b'>'), Some(2));
        assert_eq!(cur.pos(), 2);
        let mut cur = Cursor::new("abc");
        assert_eq!(cur.find(b'>'), None);
        assert!(cur.eof());
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x");
        assert_eq!(cur.bump(), Some('x'));
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.bump(), None);
    }

    #[test]
    fn next_if_only_consumes_match() {
        let mut cur = Cursor::new("(a");
        assert!(!cur.next_if(b'a'));
        assert!(cur.next_if(b'('));
        assert_eq!(cur.rest(), "a");
    }
}
