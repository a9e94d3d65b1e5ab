//! # Reference Resolver
//!
//! Link reference definitions collected during block parsing, looked up by
//! the inline engine.
//!
//! ## Modules
//!
//! - **`definition`**: `DefinitionParser`, the line-by-line state machine that
//!   peels definitions off the start of a paragraph
//!
//! ## Key Invariants
//!
//! - Keys are normalized labels (trimmed, case-folded, whitespace collapsed)
//! - The first definition of a label wins; later ones are dropped
//! - The map is read-only once block parsing finishes

pub mod definition;

use std::collections::HashMap;

use crate::parsing::text::normalize_label;

pub use definition::{DefinitionParser, DefinitionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    /// Normalized label.
    pub label: String,
    pub destination: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    entries: HashMap<String, LinkReference>,
    order: Vec<String>,
}

impl ReferenceMap {
    /// Stores a definition unless its normalized label is already present.
    /// Returns whether it was stored.
    pub fn define(&mut self, label: &str, destination: String, title: Option<String>) -> bool {
        let label = normalize_label(label);
        if self.entries.contains_key(&label) {
            return false;
        }
        self.order.push(label.clone());
        self.entries.insert(
            label.clone(),
            LinkReference {
                label,
                destination,
                title,
            },
        );
        true
    }

    pub fn resolve(&self, label: &str) -> Option<&LinkReference> {
        self.entries.get(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Definitions in the order they were first defined.
    pub fn iter(&self) -> impl Iterator<Item = &LinkReference> {
        self.order.iter().filter_map(|label| self.entries.get(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_definition_wins() {
        let mut refs = ReferenceMap::default();
        assert!(refs.define("Foo", "/first".into(), None));
        assert!(!refs.define("  FOO ", "/second".into(), Some("t".into())));

        let found = refs.resolve("foo").unwrap();
        assert_eq!(found.destination, "/first");
        assert_eq!(found.title, None);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn resolve_normalizes_whitespace() {
        let mut refs = ReferenceMap::default();
        refs.define("foo bar", "/u".into(), None);
        assert!(refs.resolve("Foo\n   BAR").is_some());
        assert!(refs.resolve("foobar").is_none());
    }

    #[test]
    fn iteration_keeps_definition_order() {
        let mut refs = ReferenceMap::default();
        refs.define("b", "/b".into(), None);
        refs.define("a", "/a".into(), None);
        let labels: Vec<_> = refs.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A"]);
    }
}
