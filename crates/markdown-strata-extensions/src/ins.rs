//! `++text++` as inserted text.

use markdown_strata_engine::node::Document;
use markdown_strata_engine::render::{Attributes, HtmlContext, HtmlNodeRenderer};
use markdown_strata_engine::{
    CustomNode, DelimiterProcessor, DelimiterRun, Extension, HtmlRendererBuilder, NodeId, NodeValue,
    ParserBuilder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ins;

impl CustomNode for Ins {
    fn name(&self) -> &'static str {
        "ins"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InsExtension;

impl Extension for InsExtension {
    fn name(&self) -> &'static str {
        "ins"
    }

    fn extend_parser(&self, builder: &mut ParserBuilder) {
        builder.delimiter_processor(InsDelimiterProcessor);
    }

    fn extend_html(&self, builder: &mut HtmlRendererBuilder) {
        builder.node_renderer(InsHtmlRenderer);
    }
}

struct InsDelimiterProcessor;

impl DelimiterProcessor for InsDelimiterProcessor {
    fn opening_char(&self) -> char {
        '+'
    }

    fn closing_char(&self) -> char {
        '+'
    }

    fn min_length(&self) -> usize {
        2
    }

    fn process(&self, opening: &DelimiterRun<'_>, closing: &DelimiterRun<'_>, doc: &mut Document) -> usize {
        if opening.len() < 2 || closing.len() < 2 {
            return 0;
        }
        doc.wrap_between(opening.opener(), closing.closer(), NodeValue::custom(Ins));
        2
    }

    fn name(&self) -> &'static str {
        "ins"
    }
}

struct InsHtmlRenderer;

impl HtmlNodeRenderer for InsHtmlRenderer {
    fn node_name(&self) -> &'static str {
        "ins"
    }

    fn render(&self, ctx: &mut HtmlContext<'_>, node: NodeId) {
        let attributes = ctx.extend_attributes(node, "ins", Attributes::new());
        ctx.writer().tag("ins", &attributes);
        ctx.render_children(node);
        ctx.writer().close_tag("ins");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::render_with;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("++foo++\n", "<p><ins>foo</ins></p>\n")]
    #[case("+foo+\n", "<p>+foo+</p>\n")]
    #[case("+++foo+++\n", "<p>+<ins>foo</ins>+</p>\n")]
    #[case("++foo\nbar++\n", "<p><ins>foo\nbar</ins></p>\n")]
    #[case("1 + 1 ++ 2\n", "<p>1 + 1 ++ 2</p>\n")]
    #[case("++*a*++\n", "<p><ins><em>a</em></ins></p>\n")]
    fn renders_ins(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render_with(InsExtension, input), expected);
    }
}
