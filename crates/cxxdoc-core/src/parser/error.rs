//! Definition parser error types

use crate::span::Span;
use thiserror::Error;

/// A malformed declaration, with the offset of the failure and the full input
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionError {
    /// The kind of error
    pub kind: DefinitionErrorKind,
    /// Where parsing stopped
    pub span: Span,
    /// The (trimmed) declaration being parsed
    pub definition: String,
}

impl DefinitionError {
    /// Create a new definition error
    #[must_use]
    pub fn new(kind: DefinitionErrorKind, span: Span, definition: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            definition: definition.into(),
        }
    }

    /// Byte offset of the failure inside the declaration
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.span.offset()
    }
}

impl std::fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid definition: {} [error at {}]\n  {}",
            self.kind,
            self.span.offset(),
            self.definition
        )
    }
}

impl std::error::Error for DefinitionError {}

/// The kind of definition error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionErrorKind {
    #[error("expected name")]
    ExpectedName,

    #[error("expected type")]
    ExpectedType,

    #[error("\",\" or \">\" in template expected")]
    ExpectedTemplateDelimiter,

    #[error("expected \"]\" for {0}")]
    ExpectedClosingBracket(&'static str),

    #[error("expected parentheses for function")]
    ExpectedParameterList,

    #[error("missing closing parentheses")]
    MissingClosingParen,

    #[error("expected comma between arguments")]
    ExpectedComma,

    #[error("unexpected end in default expression")]
    UnterminatedDefault,

    #[error("pure virtual functions must be defined with either 0, NULL or nullptr, other macros are not allowed")]
    InvalidPureVirtual,

    #[error("expected end of definition, got {0:?}")]
    TrailingInput(String),
}
