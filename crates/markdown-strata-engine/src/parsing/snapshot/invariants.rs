use crate::node::{Document, NodeId, NodeValue};

/// Panics when the tree below the root breaks a structural invariant.
pub fn check(doc: &Document) {
    check_node(doc, doc.root());
}

fn check_node(doc: &Document, node: NodeId) {
    let value = doc.value(node);
    let mut previous: Option<NodeId> = None;

    for child in doc.children(node) {
        assert_eq!(
            doc.parent(child),
            Some(node),
            "child {child:?} does not point back to its parent {node:?}"
        );
        assert_eq!(
            doc.previous_sibling(child),
            previous,
            "sibling links of {child:?} disagree"
        );

        let child_value = doc.value(child);
        if let NodeValue::Text(text) = child_value {
            assert!(!text.is_empty(), "empty Text node {child:?}");
            if let Some(prev) = previous {
                assert!(
                    !matches!(doc.value(prev), NodeValue::Text(_)),
                    "adjacent Text nodes {prev:?} and {child:?} were not merged"
                );
            }
        }

        // blocks never appear inside inline content
        if !value.is_block() || matches!(value, NodeValue::Paragraph | NodeValue::Heading(_)) {
            assert!(
                !child_value.is_block(),
                "block {:?} inside inline content of {:?}",
                child_value.kind(),
                value.kind()
            );
        }

        previous = Some(child);
        check_node(doc, child);
    }

    assert_eq!(doc.last_child(node), previous, "last child of {node:?} is stale");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Parser;

    #[test]
    fn parsed_documents_pass() {
        let doc = Parser::commonmark()
            .parse("> - *a* [b](/c)\n>   ***x**\n\n```\n~\n```\n")
            .unwrap();
        check(&doc);
    }

    #[test]
    #[should_panic(expected = "adjacent Text nodes")]
    fn unmerged_text_is_reported() {
        let mut doc = Document::new();
        let para = doc.append_child(doc.root(), NodeValue::Paragraph);
        doc.append_child(para, NodeValue::Text("a".into()));
        doc.append_child(para, NodeValue::Text("b".into()));
        check(&doc);
    }
}
