//! Syntax error type reported by the parser.

use thiserror::Error;

use crate::base::Span;

/// A malformed or unsupported construct, with the offending span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {}, column {})", .span.start.line, .span.start.column)]
pub struct SyntaxError {
    pub message: String,
    /// What would have been accepted at this point, if known.
    pub expected: Vec<String>,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            expected: Vec::new(),
            span,
        }
    }

    /// Attach the set of tokens that would have been accepted.
    pub fn with_expected<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected = expected.into_iter().map(Into::into).collect();
        self
    }
}
