//! Parser construction and limits.
//!
//! Grammar behaviour is covered next to each block and inline kind; these
//! tests exercise the builder, the limits and the extension seams.


use crate::error::{BuildError, ParseError, ResourceExhausted};
use crate::node::{Document, Fragment, NodeValue};
use crate::parsing::blocks::BlockType;
use crate::parsing::inline::{Cursor, DelimiterProcessor, DelimiterRun, InlineContentParser};
use crate::parsing::registry::PostProcessor;
use crate::parsing::snapshot;
use crate::parsing::{Parser, ParserBuilder};

fn kinds(doc: &Document) -> Vec<String> {
    doc.children(doc.root())
        .map(|child| format!("{:?}", doc.value(child).kind()))
        .collect()
}

#[test]
fn disabled_block_types_fall_back_to_paragraphs() {
    let parser = ParserBuilder::new()
        .enabled_block_types([BlockType::List])
        .build()
        .unwrap();
    let doc = parser.parse("# not a heading\n\n- item\n").unwrap();
    assert_eq!(kinds(&doc), vec!["Paragraph", "List"]);
}

#[test]
fn input_over_byte_limit_is_rejected() {
    let parser = Parser::builder().max_input_bytes(Some(8)).build().unwrap();
    let err = parser.parse("0123456789").unwrap_err();
    assert_eq!(
        err,
        ParseError::ResourceExhausted(ResourceExhausted::InputTooLarge { size: 10, limit: 8 })
    );
    assert!(parser.parse("01234567").is_ok());
}

#[test]
fn default_nesting_limit_stops_runaway_quotes() {
    let deep = format!("{}x\n", "> ".repeat(300));
    let err = Parser::commonmark().parse(&deep).unwrap_err();
    assert!(matches!(
        err,
        ParseError::ResourceExhausted(ResourceExhausted::NestingTooDeep { limit: 256, line: 1 })
    ));

    let unbounded = Parser::builder().max_nesting_depth(None).build().unwrap();
    let doc = unbounded.parse(&deep).unwrap();
    snapshot::invariants(&doc);
}

#[test]
fn deep_emphasis_is_rejected_without_exhausting_the_stack() {
    let stars = "*".repeat(20_000);
    let input = format!("{stars}a{stars}\n");
    let result = std::thread::Builder::new()
        .stack_size(1024 * 1024)
        .spawn(move || Parser::commonmark().parse(&input).map(|_| ()))
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(
        result,
        Err(ParseError::ResourceExhausted(ResourceExhausted::InlineNestingTooDeep { limit: 256 }))
    );
}

#[test]
fn emphasis_under_the_nesting_limit_renders() {
    let stars = "*".repeat(400);
    let doc = Parser::commonmark().parse(&format!("{stars}a{stars}\n")).unwrap();
    // paragraph, 200 strong levels, text
    assert_eq!(doc.depth_below(doc.root()), 202);

    let html = crate::HtmlRenderer::default().render(&doc);
    assert!(html.starts_with(&format!("<p>{}a", "<strong>".repeat(200))));
}

#[test]
fn parser_is_shareable() {
    fn assert_send_sync_clone<T: Send + Sync + Clone>() {}
    assert_send_sync_clone::<Parser>();
}

struct Shout;

impl InlineContentParser for Shout {
    fn trigger_chars(&self) -> &[char] {
        &['<']
    }

    fn try_parse(&self, cur: &mut Cursor<'_>) -> Option<Fragment> {
        if !cur.starts_with(b"<!>") {
            return None;
        }
        cur.bump_n(3);
        Some(Fragment::text("!!!"))
    }
}

#[test]
fn extension_content_parsers_run_before_core() {
    let parser = Parser::builder().inline_content_parser(Shout).build().unwrap();
    let doc = parser.parse("a <!> <b>\n").unwrap();
    let para = doc.first_child(doc.root()).unwrap();
    let values: Vec<String> = doc
        .children(para)
        .map(|c| format!("{:?}", doc.value(c)))
        .collect();
    assert_eq!(
        values,
        vec![r#"Text("a !!! ")"#.to_string(), r#"HtmlInline("<b>")"#.to_string()]
    );
}

struct Percent;

impl DelimiterProcessor for Percent {
    fn opening_char(&self) -> char {
        '*'
    }

    fn closing_char(&self) -> char {
        '*'
    }

    fn process(&self, _opening: &DelimiterRun<'_>, _closing: &DelimiterRun<'_>, _doc: &mut Document) -> usize {
        0
    }
}

#[test]
fn second_processor_for_a_character_is_a_build_error() {
    let err = Parser::builder().delimiter_processor(Percent).build().unwrap_err();
    assert_eq!(err, BuildError::DelimiterConflict('*'));
}

struct Upper;

impl PostProcessor for Upper {
    fn process(&self, doc: &mut Document) {
        let texts: Vec<_> = doc
            .descendants(doc.root())
            .filter(|&n| matches!(doc.value(n), NodeValue::Text(_)))
            .collect();
        for node in texts {
            if let NodeValue::Text(text) = doc.value_mut(node) {
                *text = text.to_uppercase();
            }
        }
    }
}

#[test]
fn post_processors_see_the_finished_tree() {
    let parser = Parser::builder().post_processor(Upper).build().unwrap();
    let doc = parser.parse("[ab]\n\n[ab]: /u\n").unwrap();
    insta::assert_snapshot!(snapshot::normalize(&doc).to_string(), @r#"
    Document
      Paragraph
        Link /u
          Text "AB"
    "#);
}

#[test]
fn references_are_exposed_after_parsing() {
    let doc = Parser::commonmark()
        .parse("[Foo  Bar]: /first\n[foo bar]: /second\n")
        .unwrap();
    assert_eq!(doc.references().len(), 1);
    let reference = doc.references().resolve("FOO BAR").unwrap();
    assert_eq!(reference.destination, "/first");
    assert!(kinds(&doc).is_empty());
}
