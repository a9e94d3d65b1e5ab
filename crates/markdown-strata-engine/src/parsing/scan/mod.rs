//! # Line Scanner
//!
//! Turns raw input into logical lines and tracks the block engine's position
//! within the current line.
//!
//! ## Modules
//!
//! - **`lines`**: `lines()` iterator splitting on `\n`, `\r\n`, `\r` and
//!   replacing NUL
//! - **`line`**: `Line` cursor with byte index, tab-aware column, indentation
//!   and blank-line queries

pub mod line;
pub mod lines;

pub use line::{CODE_BLOCK_INDENT, Line, columns_to_next_tab_stop};
pub use lines::{LineRef, lines};
