use thiserror::Error;

/// Errors a parse can end with.
///
/// Malformed Markdown is never an error: it degrades to literal text or a
/// paragraph. Only configured bounds and misbehaving extensions abort a parse,
/// and when they do the partial tree is dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    ResourceExhausted(#[from] ResourceExhausted),

    #[error(transparent)]
    ContractViolation(#[from] ContractViolation),
}

impl ParseError {
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, ParseError::ResourceExhausted(_))
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ParseError::ContractViolation(_))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceExhausted {
    #[error("Input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Block nesting exceeds the limit of {limit} levels at line {line}")]
    NestingTooDeep { limit: usize, line: usize },

    #[error("Inline nesting exceeds the limit of {limit} levels")]
    InlineNestingTooDeep { limit: usize },
}

/// A defect in extension code detected by the engine.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Extension contract violated by {component}: {reason}")]
pub struct ContractViolation {
    pub component: String,
    pub reason: String,
}

impl ContractViolation {
    pub fn new(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while assembling a parser from extensions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Delimiter processor conflict for character '{0}'")]
    DelimiterConflict(char),

    #[error("No block start matcher named '{0}' to position against")]
    UnknownMatcher(String),
}
