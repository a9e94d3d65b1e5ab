//! Task list items: `- [ ] todo` and `- [x] done`.

use std::sync::OnceLock;

use log::trace;
use markdown_strata_engine::node::Document;
use markdown_strata_engine::render::{HtmlContext, HtmlNodeRenderer};
use markdown_strata_engine::{
    CustomNode, Extension, HtmlRendererBuilder, NodeId, NodeValue, ParserBuilder, PostProcessor,
};
use regex::Regex;

fn task_regex() -> &'static Regex {
    static TASK_REGEX: OnceLock<Regex> = OnceLock::new();
    TASK_REGEX.get_or_init(|| Regex::new(r"^\[([xX\s])\]\s+(.*)$").expect("Invalid task list regex"))
}

/// Checkbox state, the first child of a task list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskListItemMarker {
    pub checked: bool,
}

impl CustomNode for TaskListItemMarker {
    fn name(&self) -> &'static str {
        "task_list_item_marker"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListItemsExtension;

impl Extension for TaskListItemsExtension {
    fn name(&self) -> &'static str {
        "task_list"
    }

    fn extend_parser(&self, builder: &mut ParserBuilder) {
        builder.post_processor(TaskListPostProcessor);
    }

    fn extend_html(&self, builder: &mut HtmlRendererBuilder) {
        builder.node_renderer(TaskListItemHtmlRenderer);
    }
}

struct TaskListPostProcessor;

impl PostProcessor for TaskListPostProcessor {
    fn process(&self, doc: &mut Document) {
        let items: Vec<NodeId> = doc
            .descendants(doc.root())
            .filter(|&node| matches!(doc.value(node), NodeValue::Item(_)))
            .collect();

        for item in items {
            let Some(paragraph) = doc
                .first_child(item)
                .filter(|&child| matches!(doc.value(child), NodeValue::Paragraph))
            else {
                continue;
            };
            let Some(text_node) = doc.first_child(paragraph) else {
                continue;
            };
            let Some(captures) = doc.value(text_node).text().and_then(|text| task_regex().captures(text)) else {
                continue;
            };
            let checked = matches!(&captures[1], "x" | "X");
            let rest = captures[2].to_string();

            if rest.is_empty() {
                doc.detach(text_node);
            } else {
                *doc.value_mut(text_node) = NodeValue::Text(rest);
            }
            doc.prepend_child(item, NodeValue::custom(TaskListItemMarker { checked }));
            trace!("Task list item {item:?} (checked: {checked})");
        }
    }
}

struct TaskListItemHtmlRenderer;

impl HtmlNodeRenderer for TaskListItemHtmlRenderer {
    fn node_name(&self) -> &'static str {
        "task_list_item_marker"
    }

    fn render(&self, ctx: &mut HtmlContext<'_>, node: NodeId) {
        let checked = ctx
            .document()
            .value(node)
            .as_custom::<TaskListItemMarker>()
            .is_some_and(|marker| marker.checked);

        let mut attributes = vec![
            ("type".to_string(), "checkbox".to_string()),
            ("disabled".to_string(), String::new()),
        ];
        if checked {
            attributes.push(("checked".to_string(), String::new()));
        }
        let attributes = ctx.extend_attributes(node, "input", attributes);
        ctx.writer().tag("input", &attributes);
        // the item text after the marker was trimmed
        ctx.writer().text(" ");
        ctx.render_children(node);
    }
}
