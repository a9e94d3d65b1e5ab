//! # Snapshot Testing Support
//!
//! Utilities for checking parse results by their shape rather than by HTML.
//!
//! ## Modules
//!
//! - **`normalize`**: converts a `Document` into a stable, serializable `Snap`
//!   tree whose `Display` is the indented dump used by inline snapshots and
//!   the CLI's `tree` format
//! - **`invariants`**: structural checks every parse result must pass (links
//!   between parent and children agree, no empty or adjacent Text nodes,
//!   inline nodes only under leaf blocks)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
