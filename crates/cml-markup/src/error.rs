//! Error types for template parsing.

use crate::span::Span;
use std::fmt;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that occurred while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The span where the error occurred.
    pub span: Span,
    /// The error code.
    pub code: ErrorCode,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    /// Create an unexpected token error.
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::new(
            format!("Expected {}, found {}", expected, found),
            span,
            ErrorCode::UnexpectedToken,
        )
    }

    /// Create an unclosed tag error.
    pub fn unclosed_tag(tag: &str, span: Span) -> Self {
        Self::new(
            format!("Unclosed tag: <{}>", tag),
            span,
            ErrorCode::UnclosedTag,
        )
    }

    /// Create a mismatched closing tag error.
    pub fn mismatched_tag(open: &str, close: &str, span: Span) -> Self {
        Self::new(
            format!("Closing tag </{}> does not match <{}>", close, open),
            span,
            ErrorCode::MismatchedTag,
        )
    }
}

/// Error codes for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unexpected token encountered.
    UnexpectedToken,
    /// Element never closed before end of input.
    UnclosedTag,
    /// Closing tag names a different element.
    MismatchedTag,
}

impl ErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "unexpected-token",
            ErrorCode::UnclosedTag => "unclosed-tag",
            ErrorCode::MismatchedTag => "mismatched-tag",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
