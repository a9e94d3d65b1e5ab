use crate::node::NodeId;

/// A run of delimiter characters on the stack, one Text node per character.
#[derive(Debug)]
pub(crate) struct Delimiter {
    /// Increases with every push; used to bound opener searches.
    pub id: usize,
    pub ch: char,
    pub can_open: bool,
    pub can_close: bool,
    pub nodes: Vec<NodeId>,
    pub original_len: usize,
}

impl Delimiter {
    pub fn run(&self) -> DelimiterRun<'_> {
        DelimiterRun {
            ch: self.ch,
            can_open: self.can_open,
            can_close: self.can_close,
            original_len: self.original_len,
            nodes: &self.nodes,
        }
    }
}

/// View of a delimiter run handed to a [`DelimiterProcessor`](super::DelimiterProcessor).
#[derive(Debug, Clone, Copy)]
pub struct DelimiterRun<'a> {
    pub ch: char,
    pub can_open: bool,
    pub can_close: bool,
    /// Length when the run was scanned, before any characters were used.
    pub original_len: usize,
    nodes: &'a [NodeId],
}

impl DelimiterRun<'_> {
    /// Characters still available.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Innermost node of an opening run: its last character.
    pub fn opener(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Innermost node of a closing run: its first character.
    pub fn closer(&self) -> NodeId {
        self.nodes[0]
    }
}

/// An unresolved `[` or `![`.
#[derive(Debug)]
pub(crate) struct Bracket {
    /// Text node holding `[` or `![`.
    pub node: NodeId,
    /// Position right after the bracket.
    pub content_start: usize,
    pub image: bool,
    /// Cleared once an enclosing link is found; links do not nest.
    pub allowed: bool,
    /// Another bracket follows this one, so its content cannot be a label.
    pub bracket_after: bool,
    /// Delimiter stack length when the bracket was pushed.
    pub prev_delimiter: usize,
}
