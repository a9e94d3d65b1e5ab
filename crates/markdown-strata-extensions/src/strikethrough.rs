//! GFM strikethrough: `~text~` or `~~text~~`.

use markdown_strata_engine::node::Document;
use markdown_strata_engine::render::{Attributes, HtmlContext, HtmlNodeRenderer};
use markdown_strata_engine::{
    CustomNode, DelimiterProcessor, DelimiterRun, Extension, HtmlRendererBuilder, NodeId, NodeValue,
    ParserBuilder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strikethrough;

impl CustomNode for Strikethrough {
    fn name(&self) -> &'static str {
        "strikethrough"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StrikethroughExtension {
    require_two_tildes: bool,
}

impl StrikethroughExtension {
    /// Only `~~text~~` counts; single tildes stay literal.
    pub fn require_two_tildes(mut self, require: bool) -> Self {
        self.require_two_tildes = require;
        self
    }
}

impl Extension for StrikethroughExtension {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn extend_parser(&self, builder: &mut ParserBuilder) {
        builder.delimiter_processor(StrikethroughDelimiterProcessor {
            min_length: if self.require_two_tildes { 2 } else { 1 },
        });
    }

    fn extend_html(&self, builder: &mut HtmlRendererBuilder) {
        builder.node_renderer(StrikethroughHtmlRenderer);
    }
}

struct StrikethroughDelimiterProcessor {
    min_length: usize,
}

impl DelimiterProcessor for StrikethroughDelimiterProcessor {
    fn opening_char(&self) -> char {
        '~'
    }

    fn closing_char(&self) -> char {
        '~'
    }

    fn min_length(&self) -> usize {
        self.min_length
    }

    fn process(&self, opening: &DelimiterRun<'_>, closing: &DelimiterRun<'_>, doc: &mut Document) -> usize {
        // runs must match exactly, so `~~~a~~~` stays text
        if opening.len() != closing.len() || opening.len() > 2 {
            return 0;
        }
        doc.wrap_between(opening.opener(), closing.closer(), NodeValue::custom(Strikethrough));
        opening.len()
    }

    fn name(&self) -> &'static str {
        "strikethrough"
    }
}

struct StrikethroughHtmlRenderer;

impl HtmlNodeRenderer for StrikethroughHtmlRenderer {
    fn node_name(&self) -> &'static str {
        "strikethrough"
    }

    fn render(&self, ctx: &mut HtmlContext<'_>, node: NodeId) {
        let attributes = ctx.extend_attributes(node, "del", Attributes::new());
        ctx.writer().tag("del", &attributes);
        ctx.render_children(node);
        ctx.writer().close_tag("del");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::render_with;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("~~foo~~\n", "<p><del>foo</del></p>\n")]
    #[case("~foo~\n", "<p><del>foo</del></p>\n")]
    #[case("a ~~~foo~~~\n", "<p>a ~~~foo~~~</p>\n")]
    #[case("~~foo~\n", "<p>~~foo~</p>\n")]
    #[case("~~foo\nbar~~\n", "<p><del>foo\nbar</del></p>\n")]
    #[case("**~~a~~** ~~*b*~~\n", "<p><strong><del>a</del></strong> <del><em>b</em></del></p>\n")]
    #[case("~~ foo~~\n", "<p>~~ foo~~</p>\n")]
    #[case("`~~code~~`\n", "<p><code>~~code~~</code></p>\n")]
    fn renders_del(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render_with(StrikethroughExtension::default(), input), expected);
    }

    #[test]
    fn two_tildes_can_be_required() {
        let extension = StrikethroughExtension::default().require_two_tildes(true);
        assert_eq!(render_with(extension, "~a~ ~~b~~\n"), "<p>~a~ <del>b</del></p>\n");
    }
}
