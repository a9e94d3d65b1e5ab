use std::sync::OnceLock;

use regex::Regex;

use crate::node::{Document, NodeId, NodeValue};
use crate::parsing::blocks::{
    BlockContinue, BlockParser, BlockStart, BlockStartFactory, BlockState, MatchedBlock,
};
use crate::parsing::html_patterns::{close_tag, open_tag};
use crate::parsing::scan::CODE_BLOCK_INDENT;

const BLOCK_TAGS: &str = "address|article|aside|base|basefont|blockquote|body|caption|center|col|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame|frameset|h1|h2|h3|h4|h5|h6|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem|nav|noframes|ol|optgroup|option|p|param|search|section|summary|table|tbody|td|tfoot|th|thead|title|tr|track|ul";

/// Opener and closer for each of the seven HTML block kinds. Kinds 6 and 7
/// have no closer; they end at a blank line.
struct HtmlBlockKind {
    opener: Regex,
    closer: Option<Regex>,
}

fn html_block_kinds() -> &'static [HtmlBlockKind; 7] {
    static KINDS: OnceLock<[HtmlBlockKind; 7]> = OnceLock::new();
    KINDS.get_or_init(|| {
        let re = |pattern: &str| Regex::new(pattern).expect("Invalid HTML block regex");
        [
            HtmlBlockKind {
                opener: re(r"(?i)^<(?:script|pre|style|textarea)(?:\s|>|$)"),
                closer: Some(re(r"(?i)</(?:script|pre|style|textarea)>")),
            },
            HtmlBlockKind {
                opener: re(r"^<!--"),
                closer: Some(re(r"-->")),
            },
            HtmlBlockKind {
                opener: re(r"^<[?]"),
                closer: Some(re(r"\?>")),
            },
            HtmlBlockKind {
                opener: re(r"^<![A-Za-z]"),
                closer: Some(re(r">")),
            },
            HtmlBlockKind {
                opener: re(r"^<!\[CDATA\["),
                closer: Some(re(r"\]\]>")),
            },
            HtmlBlockKind {
                opener: re(&format!(r"(?i)^</?(?:{BLOCK_TAGS})(?:\s|/?>|$)")),
                closer: None,
            },
            HtmlBlockKind {
                opener: re(&format!(r"(?i)^(?:{}|{})\s*$", open_tag(), close_tag())),
                closer: None,
            },
        ]
    })
}

/// Index of the last kind, the one that may not interrupt a paragraph.
const GENERIC_TAG_KIND: usize = 6;

#[derive(Debug)]
pub struct HtmlBlockParser {
    closer: Option<&'static Regex>,
    finished: bool,
    lines: Vec<String>,
}

impl HtmlBlockParser {
    fn new(closer: Option<&'static Regex>) -> Self {
        Self {
            closer,
            finished: false,
            lines: Vec::new(),
        }
    }
}

impl BlockParser for HtmlBlockParser {
    fn create_node(&self) -> NodeValue {
        NodeValue::HtmlBlock(String::new())
    }

    fn try_continue(&mut self, state: &BlockState<'_>, _node: NodeId) -> Option<BlockContinue> {
        if self.finished || (state.is_blank() && self.closer.is_none()) {
            return None;
        }
        Some(BlockContinue::AtIndex(state.index()))
    }

    fn add_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
        if self.closer.is_some_and(|closer| closer.is_match(line)) {
            self.finished = true;
        }
    }

    fn close_block(&mut self, doc: &mut Document, node: NodeId) {
        if let NodeValue::HtmlBlock(literal) = doc.value_mut(node) {
            *literal = self.lines.join("\n");
        }
    }
}

pub struct HtmlBlockStart;

impl BlockStartFactory for HtmlBlockStart {
    fn name(&self) -> &'static str {
        "html_block"
    }

    fn try_start(&self, state: &BlockState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        let rest = state.rest();
        if state.indent() >= CODE_BLOCK_INDENT || !rest.starts_with('<') {
            return None;
        }
        let interrupts = matches!(matched.value, NodeValue::Paragraph)
            || state.active_can_have_lazy_continuation();

        html_block_kinds()
            .iter()
            .enumerate()
            .filter(|(i, _)| !(*i == GENERIC_TAG_KIND && interrupts))
            .find(|(_, kind)| kind.opener.is_match(rest))
            .map(|(_, kind)| {
                BlockStart::single(HtmlBlockParser::new(kind.closer.as_ref()))
                    .at_index(state.index())
            })
    }
}
