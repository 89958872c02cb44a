//! Error types for directive transformation.

use cml_markup::{ParseError, Span};
use smol_str::SmolStr;

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// A compile-time failure, tied to the offending element where there is one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The template could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// `v-else-if` / `v-else` without a preceding `v-if` / `v-else-if` sibling.
    #[error("`{directive}` on <{tag}> has no preceding v-if or v-else-if sibling")]
    Chain {
        tag: SmolStr,
        directive: SmolStr,
        span: Span,
    },

    /// A `v-for` expression that is not `alias in source`.
    #[error("invalid v-for expression `{expression}` on <{tag}>")]
    IterationSyntax {
        tag: SmolStr,
        expression: String,
        span: Span,
    },

    /// The target identifier is not one of the supported platforms.
    #[error("unknown target platform `{0}` (expected one of web, weex, wx, alipay, baidu)")]
    UnknownPlatform(String),

    /// Two directives write the same attribute slot and cannot be merged.
    #[error("`{first}` and `{second}` on <{tag}> target the same attribute")]
    ConflictingDirective {
        tag: SmolStr,
        first: SmolStr,
        second: SmolStr,
        span: Span,
    },
}

impl TransformError {
    /// The span of the offending element or token, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Parse(err) => Some(err.span),
            Self::Chain { span, .. }
            | Self::IterationSyntax { span, .. }
            | Self::ConflictingDirective { span, .. } => Some(*span),
            Self::UnknownPlatform(_) => None,
        }
    }

    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(err) => err.code.as_str(),
            Self::Chain { .. } => "directive-chain",
            Self::IterationSyntax { .. } => "invalid-v-for",
            Self::UnknownPlatform(_) => "unknown-platform",
            Self::ConflictingDirective { .. } => "conflicting-directive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cml_markup::ErrorCode;

    #[test]
    fn test_error_codes() {
        let parse = TransformError::from(ParseError::new("x", Span::new(1, 2), ErrorCode::UnclosedTag));
        assert_eq!(parse.code(), "unclosed-tag");
        assert_eq!(parse.span(), Some(Span::new(1, 2)));

        let platform = TransformError::UnknownPlatform("qq".into());
        assert_eq!(platform.code(), "unknown-platform");
        assert_eq!(platform.span(), None);
    }

    #[test]
    fn test_chain_message() {
        let err = TransformError::Chain {
            tag: "view".into(),
            directive: "v-else".into(),
            span: Span::new(0, 10),
        };
        assert_eq!(
            err.to_string(),
            "`v-else` on <view> has no preceding v-if or v-else-if sibling"
        );
    }
}
