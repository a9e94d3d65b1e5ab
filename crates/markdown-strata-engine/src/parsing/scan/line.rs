use std::borrow::Cow;

use super::lines::LineRef;

/// Indentation at which content becomes an indented code block.
pub const CODE_BLOCK_INDENT: usize = 4;

pub fn columns_to_next_tab_stop(column: usize) -> usize {
    4 - (column % 4)
}

/// Cursor over the line currently being fed to the block engine.
///
/// `index` is a byte offset into the line, `column` the visual column with
/// tabs expanded to multiples of four. When a container marker consumes only
/// part of a tab, `column_is_in_tab` is set and the rest of that tab is handed
/// to the content as spaces.
#[derive(Debug, Default)]
pub struct Line {
    content: String,
    number: usize,
    index: usize,
    column: usize,
    column_is_in_tab: bool,
    next_non_space: usize,
    next_non_space_column: usize,
    indent: usize,
    blank: bool,
}

impl Line {
    pub fn reset(&mut self, line: LineRef<'_>) {
        self.content = line.text.into_owned();
        self.number = line.number;
        self.index = 0;
        self.column = 0;
        self.column_is_in_tab = false;
        self.find_next_non_space();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn next_non_space(&self) -> usize {
        self.next_non_space
    }

    pub fn next_non_space_column(&self) -> usize {
        self.next_non_space_column
    }

    /// Columns between the current position and the next non-space character.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// True if nothing but spaces and tabs remain.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn column_is_in_tab(&self) -> bool {
        self.column_is_in_tab
    }

    pub fn char_at(&self, index: usize) -> Option<char> {
        self.content.get(index..)?.chars().next()
    }

    pub fn find_next_non_space(&mut self) {
        let bytes = self.content.as_bytes();
        let mut i = self.index;
        let mut cols = self.column;
        self.blank = true;
        while i < bytes.len() {
            match bytes[i] {
                b' ' => {
                    i += 1;
                    cols += 1;
                }
                b'\t' => {
                    i += 1;
                    cols += columns_to_next_tab_stop(cols);
                }
                _ => {
                    self.blank = false;
                    break;
                }
            }
        }
        self.next_non_space = i;
        self.next_non_space_column = cols;
        self.indent = cols - self.column;
    }

    pub fn advance_to_index(&mut self, new_index: usize) {
        if new_index >= self.next_non_space && self.index <= self.next_non_space {
            self.index = self.next_non_space;
            self.column = self.next_non_space_column;
        }
        while self.index < new_index && self.index < self.content.len() {
            self.advance();
        }
        self.column_is_in_tab = false;
    }

    pub fn advance_to_column(&mut self, new_column: usize) {
        if new_column >= self.next_non_space_column && self.index <= self.next_non_space {
            self.index = self.next_non_space;
            self.column = self.next_non_space_column;
        }
        while self.column < new_column && self.index < self.content.len() {
            self.advance();
        }
        if self.column > new_column {
            // overshot inside a tab
            self.index -= 1;
            self.column = new_column;
            self.column_is_in_tab = true;
        } else {
            self.column_is_in_tab = false;
        }
    }

    fn advance(&mut self) {
        let Some(c) = self.char_at(self.index) else {
            return;
        };
        self.index += c.len_utf8();
        if c == '\t' {
            self.column += columns_to_next_tab_stop(self.column);
        } else {
            self.column += 1;
        }
    }

    /// Unconsumed remainder of the line as block content.
    pub fn remaining(&self) -> Cow<'_, str> {
        if self.column_is_in_tab {
            let spaces = columns_to_next_tab_stop(self.column);
            let rest = &self.content[self.index + 1..];
            let mut s = String::with_capacity(spaces + rest.len());
            s.extend(std::iter::repeat_n(' ', spaces));
            s.push_str(rest);
            Cow::Owned(s)
        } else {
            Cow::Borrowed(&self.content[self.index..])
        }
    }
}
