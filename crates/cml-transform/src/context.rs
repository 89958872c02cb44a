//! Transform context shared by every pass.

use crate::normalize::{CmssNormalizer, DeclarationNormalizer};
use crate::style_config::StyleConfig;
use crate::target::{Target, TargetDescriptor};

static DEFAULT_NORMALIZER: CmssNormalizer = CmssNormalizer;

/// Read-only state for one compilation.
#[derive(Clone, Copy)]
pub struct TransformContext<'a> {
    /// Directive table of the output platform.
    pub descriptor: &'static TargetDescriptor,
    /// Style options handed to the style proxy and the normalizer.
    pub style: Option<&'a StyleConfig>,
    /// Rewrites static style declarations.
    pub normalizer: &'a dyn DeclarationNormalizer,
}

impl<'a> TransformContext<'a> {
    /// Create a context for `target` with the built-in normalizer and no
    /// style options.
    pub fn new(target: Target) -> Self {
        Self {
            descriptor: target.descriptor(),
            style: None,
            normalizer: &DEFAULT_NORMALIZER,
        }
    }

    pub fn with_style(mut self, style: Option<&'a StyleConfig>) -> Self {
        self.style = style;
        self
    }

    pub fn with_normalizer(mut self, normalizer: &'a dyn DeclarationNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn target(&self) -> Target {
        self.descriptor.target
    }

    /// Run the normalizer over a static style value.
    pub fn normalize_style(&self, declarations: &str) -> String {
        self.normalizer
            .normalize(declarations, self.target(), self.style)
    }
}

impl std::fmt::Debug for TransformContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformContext")
            .field("target", &self.target())
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}
