use crate::node::{Document, NodeValue};
use crate::parsing::inline::{DelimiterProcessor, DelimiterRun};

/// `*` and `_` emphasis: one character makes Emphasis, two make Strong.
pub struct EmphasisDelimiterProcessor {
    ch: char,
}

impl EmphasisDelimiterProcessor {
    pub fn new(ch: char) -> Self {
        Self { ch }
    }
}

impl DelimiterProcessor for EmphasisDelimiterProcessor {
    fn opening_char(&self) -> char {
        self.ch
    }

    fn closing_char(&self) -> char {
        self.ch
    }

    fn process(&self, opening: &DelimiterRun<'_>, closing: &DelimiterRun<'_>, doc: &mut Document) -> usize {
        // rule of three for runs that can both open and close
        if (opening.can_close || closing.can_open)
            && closing.original_len % 3 != 0
            && (opening.original_len + closing.original_len) % 3 == 0
        {
            return 0;
        }

        let (used, value) = if opening.len() >= 2 && closing.len() >= 2 {
            (2, NodeValue::Strong(self.ch))
        } else {
            (1, NodeValue::Emphasis(self.ch))
        };
        doc.wrap_between(opening.opener(), closing.closer(), value);
        used
    }
}
