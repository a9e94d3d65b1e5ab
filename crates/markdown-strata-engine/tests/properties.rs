//! Structural properties of parse results.

use markdown_strata_engine::node::{Document, NodeId, NodeValue};
use markdown_strata_engine::parsing::snapshot;
use markdown_strata_engine::{HtmlRenderer, MarkdownRenderer, Parser};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parse(input: &str) -> Document {
    let doc = Parser::commonmark().parse(input).unwrap();
    snapshot::invariants(&doc);
    doc
}

fn only_child(doc: &Document, node: NodeId) -> NodeId {
    let mut children = doc.children(node);
    let child = children.next().expect("one child");
    assert!(children.next().is_none(), "more than one child");
    child
}

#[rstest]
#[case("# Title\n\nSome *emphasis* and **strong** text.\n")]
#[case("Setext\nspanning lines\n---\n")]
#[case("> quote with `code` and [a link](/url \"title\")\n> continued\n")]
#[case("- tight\n- list\n  - nested\n\n1. loose\n\n2. ordered\n")]
#[case("3) start\n4) here\n")]
#[case("```rust\nfn main() {\n    println!(\"``\");\n}\n```\n")]
#[case("    indented\n\n    code\n")]
#[case("<div>\n*raw*\n</div>\n\nafter\n")]
#[case("a  \nhard\\\nbreaks\n")]
#[case("1\\. not a list\n\n\\# not a heading\n")]
#[case("![alt *text*](/img.png) and <http://auto.link>\n")]
#[case("***\n\n_under_ and __score__\n")]
#[case("[ref]\n\n[ref]: /target 'Title'\n")]
#[case("> - a\n>\n>   b\n> 1. c\n")]
#[case("Foo *bar\nbaz* and **qux\nquux**\n====\n")]
#[case("&#9;tab &#10; newline&#13;\n")]
#[case("&#32;edges&#32;\nand *&#32;inside&#32;*\n")]
#[case("a\n    <div> b\nc <!-- d\ne -->\n")]
#[case("x\n\\# h\n\\- l\n\\> q\n1\\. o\n\\=\n")]
#[case("<http://x.org/&amp;>\n\n[y](/p?a=1&b=2 \"&amp; t\")\n")]
fn canonical_markdown_reparses_to_the_same_tree(#[case] input: &str) {
    let original = parse(input);
    let canonical = MarkdownRenderer::new().render(&original);
    let reparsed = parse(&canonical);
    assert_eq!(
        snapshot::normalize(&reparsed),
        snapshot::normalize(&original),
        "canonical form:\n{canonical}"
    );
}

/// Emphasis markers in the input reappear either as wrapper nodes or as
/// literal text, never both and never lost.
#[rstest]
#[case("*foo*")]
#[case("**a*b**")]
#[case("***foo** bar*")]
#[case("*foo**bar**baz*")]
#[case("**foo*")]
#[case("a * b ** c *** d")]
#[case("_a __b__ c_ *d* __e")]
#[case("*(*foo*)*")]
#[case("foo***bar***baz")]
fn delimiters_are_conserved(#[case] input: &str) {
    let doc = parse(input);
    let mut in_text = 0;
    let mut in_nodes = 0;
    for node in doc.descendants(doc.root()) {
        match doc.value(node) {
            NodeValue::Text(text) => in_text += text.chars().filter(|c| matches!(c, '*' | '_')).count(),
            NodeValue::Emphasis(_) => in_nodes += 2,
            NodeValue::Strong(_) => in_nodes += 4,
            _ => {}
        }
    }
    let expected = input.chars().filter(|c| matches!(c, '*' | '_')).count();
    assert_eq!(in_text + in_nodes, expected);
}

#[test]
fn first_reference_definition_wins() {
    let doc = parse("[Foo Bar]: /one\n[foo   BAR]: /two\n\n[FOO bar]\n");
    assert_eq!(doc.references().resolve("foo bar").unwrap().destination, "/one");
    assert_eq!(
        HtmlRenderer::default().render(&doc),
        "<p><a href=\"/one\">FOO bar</a></p>\n"
    );
}

#[test]
fn item_indentation_bounds_continuation() {
    let doc = parse("  1. Foo\n\n    bar\n");
    let root = doc.root();
    let list = doc.first_child(root).unwrap();
    let item = only_child(&doc, list);
    let NodeValue::Item(data) = doc.value(item) else {
        panic!("expected item");
    };
    assert_eq!((data.marker_indent, data.content_indent), (2, 5));
    // four columns is below the content indent: the item ends
    assert_eq!(doc.children(root).count(), 2);
    assert!(matches!(doc.value(doc.last_child(root).unwrap()), NodeValue::CodeBlock(_)));

    let doc = parse("  1. Foo\n\n     bar\n");
    let list = only_child(&doc, doc.root());
    let item = only_child(&doc, list);
    assert_eq!(doc.children(item).count(), 2);
}

#[rstest]
#[case::emphasis("*foo*\n", "<p><em>foo</em></p>\n")]
#[case::reference("[foo]: /url\n\n[foo]\n", "<p><a href=\"/url\">foo</a></p>\n")]
#[case::lazy_quote("> a\nb\n", "<blockquote>\n<p>a\nb</p>\n</blockquote>\n")]
#[case::thematic_break("***\n", "<hr />\n")]
#[case::rule_of_three("**a*b**\n", "<p><strong>a*b</strong></p>\n")]
fn end_to_end(#[case] input: &str, #[case] expected: &str) {
    let doc = parse(input);
    assert_eq!(HtmlRenderer::default().render(&doc), expected);
}

#[test]
fn lazy_quote_keeps_one_paragraph() {
    let doc = parse("> a\nb\n");
    let quote = only_child(&doc, doc.root());
    let para = only_child(&doc, quote);
    assert_eq!(doc.text_content(para), "a\nb");
}

#[test]
fn one_parser_serves_many_threads() {
    let parser = Parser::commonmark();
    let inputs = ["*a*\n", "- b\n- c\n", "> d\n", "[e]\n\n[e]: /e\n"];
    let expected: Vec<String> = inputs
        .iter()
        .map(|input| HtmlRenderer::default().render(&parser.parse(input).unwrap()))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let parser = parser.clone();
                scope.spawn(move || HtmlRenderer::default().render(&parser.parse(input).unwrap()))
            })
            .collect();
        let rendered: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(rendered, expected);
    });
}
