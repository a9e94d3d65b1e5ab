//! Extension points and the ordering of block-start matchers.
//!
//! Everything an extension contributes is collected by
//! [`ParserBuilder`](super::ParserBuilder) and frozen into a
//! [`Parser`](super::Parser) by `build`. Nothing is registered after that.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::blocks::{BlockStartFactory, BlockType};
use super::ParserBuilder;
use crate::error::BuildError;
use crate::node::Document;
use crate::render::html::HtmlRendererBuilder;

/// A bundle of parser and renderer additions.
///
/// Extensions are applied in the order they are supplied. Within one
/// extension, contributions keep their registration order too.
pub trait Extension: Send + Sync {
    fn name(&self) -> &'static str;

    fn extend_parser(&self, _builder: &mut ParserBuilder) {}

    fn extend_html(&self, _builder: &mut HtmlRendererBuilder) {}
}

/// Runs over the whole document after inline parsing.
pub trait PostProcessor: Send + Sync {
    fn process(&self, doc: &mut Document);
}

/// Where an extension block start goes relative to the core matchers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Placement {
    First,
    #[default]
    Last,
    /// Directly before the named core matcher, e.g. `"list"`.
    Before(String),
    After(String),
}

impl Placement {
    pub fn before(name: impl Into<String>) -> Self {
        Placement::Before(name.into())
    }

    pub fn after(name: impl Into<String>) -> Self {
        Placement::After(name.into())
    }
}

struct Slot {
    factory: Arc<dyn BlockStartFactory>,
    core: Option<BlockType>,
}

/// Merges extension block starts into the core list and drops disabled core
/// types. Placements are resolved against every core matcher, enabled or not,
/// so switching a type off does not move the extensions around it.
pub(crate) fn order_block_starts(
    core: Vec<Arc<dyn BlockStartFactory>>,
    extra: &[(Arc<dyn BlockStartFactory>, Placement)],
    enabled: &HashSet<BlockType>,
) -> Result<Vec<Arc<dyn BlockStartFactory>>, BuildError> {
    let mut slots: Vec<Slot> = core
        .into_iter()
        .map(|factory| {
            let core = BlockType::from_name(factory.name());
            Slot { factory, core }
        })
        .collect();

    let mut firsts = 0;
    let mut after_counts: HashMap<BlockType, usize> = HashMap::new();
    for (factory, placement) in extra {
        let slot = Slot {
            factory: Arc::clone(factory),
            core: None,
        };
        match placement {
            Placement::First => {
                slots.insert(firsts, slot);
                firsts += 1;
            }
            Placement::Last => slots.push(slot),
            Placement::Before(name) => {
                let index = core_position(&slots, name)?;
                slots.insert(index, slot);
            }
            Placement::After(name) => {
                let index = core_position(&slots, name)?;
                let anchor = slots[index].core;
                let count = anchor.map_or(0, |t| *after_counts.entry(t).or_default());
                slots.insert(index + 1 + count, slot);
                if let Some(t) = anchor {
                    after_counts.insert(t, count + 1);
                }
            }
        }
    }

    Ok(slots
        .into_iter()
        .filter(|slot| slot.core.is_none_or(|t| enabled.contains(&t)))
        .map(|slot| slot.factory)
        .collect())
}

fn core_position(slots: &[Slot], name: &str) -> Result<usize, BuildError> {
    BlockType::from_name(name)
        .and_then(|t| slots.iter().position(|slot| slot.core == Some(t)))
        .ok_or_else(|| BuildError::UnknownMatcher(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::kinds::core_block_starts;
    use crate::parsing::blocks::{BlockStart, BlockState, MatchedBlock};
    use pretty_assertions::assert_eq;

    struct Named(&'static str);

    impl BlockStartFactory for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn try_start(&self, _state: &BlockState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
            None
        }
    }

    fn names(
        extra: Vec<(&'static str, Placement)>,
        enabled: &[BlockType],
    ) -> Result<Vec<&'static str>, BuildError> {
        let extra: Vec<(Arc<dyn BlockStartFactory>, Placement)> = extra
            .into_iter()
            .map(|(name, placement)| (Arc::new(Named(name)) as Arc<dyn BlockStartFactory>, placement))
            .collect();
        let enabled = enabled.iter().copied().collect();
        Ok(order_block_starts(core_block_starts(), &extra, &enabled)?
            .iter()
            .map(|f| f.name())
            .collect())
    }

    #[test]
    fn placements_keep_registration_order() {
        let order = names(
            vec![
                ("table", Placement::before("list")),
                ("front_matter", Placement::First),
                ("a1", Placement::after("heading")),
                ("a2", Placement::after("heading")),
                ("tail", Placement::Last),
                ("b2", Placement::before("list")),
            ],
            &BlockType::ALL,
        )
        .unwrap();
        assert_eq!(
            order,
            vec![
                "front_matter",
                "block_quote",
                "heading",
                "a1",
                "a2",
                "fenced_code",
                "html_block",
                "thematic_break",
                "table",
                "b2",
                "list",
                "indented_code",
                "tail",
            ]
        );
    }

    #[test]
    fn disabled_core_types_are_dropped_but_still_anchor() {
        let order = names(
            vec![("table", Placement::before("list"))],
            &[BlockType::Heading, BlockType::ThematicBreak],
        )
        .unwrap();
        assert_eq!(order, vec!["heading", "thematic_break", "table"]);
    }

    #[test]
    fn unknown_anchor_is_a_build_error() {
        let err = names(vec![("x", Placement::before("tables"))], &BlockType::ALL).unwrap_err();
        assert_eq!(err, BuildError::UnknownMatcher("tables".to_string()));
    }
}
