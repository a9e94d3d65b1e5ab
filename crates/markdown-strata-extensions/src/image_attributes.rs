//! `![alt](src){width=10 height=20}` sets the size of an image.

use markdown_strata_engine::node::Document;
use markdown_strata_engine::render::{AttributeProvider, Attributes};
use markdown_strata_engine::{
    CustomNode, DelimiterProcessor, DelimiterRun, Extension, HtmlRendererBuilder, NodeId, NodeValue,
    ParserBuilder,
};

const SUPPORTED_ATTRIBUTES: [&str; 2] = ["width", "height"];

/// Attributes for the parent image, in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttributes {
    pub attributes: Vec<(String, String)>,
}

impl CustomNode for ImageAttributes {
    fn name(&self) -> &'static str {
        "image_attributes"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageAttributesExtension;

impl Extension for ImageAttributesExtension {
    fn name(&self) -> &'static str {
        "image_attributes"
    }

    fn extend_parser(&self, builder: &mut ParserBuilder) {
        builder.delimiter_processor(ImageAttributesDelimiterProcessor);
    }

    fn extend_html(&self, builder: &mut HtmlRendererBuilder) {
        builder.attribute_provider(ImageAttributesProvider);
    }
}

struct ImageAttributesDelimiterProcessor;

impl DelimiterProcessor for ImageAttributesDelimiterProcessor {
    fn opening_char(&self) -> char {
        '{'
    }

    fn closing_char(&self) -> char {
        '}'
    }

    fn process(&self, opening: &DelimiterRun<'_>, closing: &DelimiterRun<'_>, doc: &mut Document) -> usize {
        if opening.len() != 1 {
            return 0;
        }
        let opener = opening.opener();
        let Some(image) = doc
            .previous_sibling(opener)
            .filter(|&node| matches!(doc.value(node), NodeValue::Image(_)))
        else {
            return 0;
        };

        let mut between = Vec::new();
        let mut content = String::new();
        let mut next = doc.next_sibling(opener);
        while let Some(node) = next {
            if node == closing.closer() {
                break;
            }
            let NodeValue::Text(text) = doc.value(node) else {
                return 0;
            };
            content.push_str(text);
            between.push(node);
            next = doc.next_sibling(node);
        }

        let Some(attributes) = parse_attributes(&content) else {
            return 0;
        };
        for node in between {
            doc.detach(node);
        }
        doc.append_child(image, NodeValue::custom(ImageAttributes { attributes }));
        1
    }

    fn name(&self) -> &'static str {
        "image_attributes"
    }
}

/// `key=value` pairs separated by whitespace. Every key must be supported.
fn parse_attributes(content: &str) -> Option<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for token in content.split_whitespace() {
        let mut parts = token.split('=');
        let key = parts.next()?;
        let value = parts.next().filter(|value| !value.is_empty())?;
        if !SUPPORTED_ATTRIBUTES.contains(&key.to_ascii_lowercase().as_str()) {
            return None;
        }
        attributes.push((key.to_string(), value.to_string()));
    }
    (!attributes.is_empty()).then_some(attributes)
}

struct ImageAttributesProvider;

impl AttributeProvider for ImageAttributesProvider {
    fn set_attributes(&self, doc: &Document, node: NodeId, tag: &str, attributes: &mut Attributes) {
        if tag != "img" {
            return;
        }
        let extra = doc
            .children(node)
            .filter_map(|child| doc.value(child).as_custom::<ImageAttributes>());
        for image_attributes in extra {
            for (key, value) in &image_attributes.attributes {
                match attributes.iter_mut().find(|(existing, _)| existing == key) {
                    Some((_, existing)) => existing.clone_from(value),
                    None => attributes.push((key.clone(), value.clone())),
                }
            }
        }
    }
}
