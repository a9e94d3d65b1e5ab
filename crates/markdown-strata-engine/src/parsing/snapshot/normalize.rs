use std::fmt;

use serde::Serialize;

use crate::node::{Document, ListKind, NodeId, NodeValue};

/// One node of a normalized tree.
///
/// `detail` carries the data that matters for structural equality (levels,
/// destinations, literals). Presentation-only data such as the fence
/// character of a code block is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snap {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Snap>,
}

pub fn normalize(doc: &Document) -> Snap {
    normalize_node(doc, doc.root())
}

fn normalize_node(doc: &Document, node: NodeId) -> Snap {
    let value = doc.value(node);
    let kind = match value {
        NodeValue::Custom(custom) => custom.name().to_string(),
        other => format!("{:?}", other.kind()),
    };
    let detail = match value {
        NodeValue::List(list) => Some(match list.kind {
            ListKind::Bullet { marker } => format!("bullet {marker} tight={}", list.tight),
            ListKind::Ordered { start, delimiter } => {
                format!("ordered {start}{delimiter} tight={}", list.tight)
            }
        }),
        NodeValue::Heading(heading) => Some(format!("h{}", heading.level)),
        NodeValue::CodeBlock(code) => Some(format!("{:?} {:?}", code.info, code.literal)),
        NodeValue::HtmlBlock(s) | NodeValue::HtmlInline(s) | NodeValue::Text(s) | NodeValue::Code(s) => {
            Some(format!("{s:?}"))
        }
        NodeValue::Link(link) | NodeValue::Image(link) => Some(match &link.title {
            Some(title) => format!("{} {title:?}", link.destination),
            None => link.destination.clone(),
        }),
        NodeValue::Custom(custom) => Some(format!("{custom:?}")),
        _ => None,
    };
    Snap {
        kind,
        detail,
        children: doc.children(node).map(|child| normalize_node(doc, child)).collect(),
    }
}

impl Snap {
    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.kind, indent = depth * 2)?;
        if let Some(detail) = &self.detail {
            write!(f, " {detail}")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Snap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Parser;

    #[test]
    fn dump_shows_details_indented() {
        let doc = Parser::commonmark().parse("# Hi *there*\n\n- a\n").unwrap();
        insta::assert_snapshot!(normalize(&doc).to_string(), @r#"
        Document
          Heading h1
            Text "Hi "
            Emphasis
              Text "there"
          List bullet - tight=true
            Item
              Paragraph
                Text "a"
        "#);
    }

    #[test]
    fn serializes_without_empty_fields() {
        let doc = Parser::commonmark().parse("#\n\n***\n").unwrap();
        insta::assert_yaml_snapshot!(normalize(&doc), @r"
        kind: Document
        children:
          - kind: Heading
            detail: h1
          - kind: ThematicBreak
        ");
    }

    #[test]
    fn fence_style_does_not_matter() {
        let fenced = Parser::commonmark().parse("```\ncode\n```\n").unwrap();
        let indented = Parser::commonmark().parse("    code\n").unwrap();
        assert_eq!(normalize(&fenced), normalize(&indented));
    }
}
