//! Directive transformation for cml templates.
//!
//! A single template written with Vue-style directives is rewritten, one
//! attribute at a time, into the dialect of a target runtime: plain web,
//! weex, or one of the wx / alipay / baidu mini programs. Each directive
//! family is handled by a [`TransformPass`]; the passes consult the
//! [`TargetDescriptor`] of the target instead of branching on it.

pub mod context;
pub mod directive;
pub mod error;
pub mod js;
pub mod normalize;
pub mod pipeline;
pub mod style_config;
pub mod target;
pub mod transforms;

pub use context::TransformContext;
pub use directive::{Directive, DirectiveKind};
pub use error::{TransformError, TransformResult};
pub use normalize::{CmssNormalizer, DeclarationNormalizer};
pub use pipeline::{run_pass, Pipeline, TransformPass};
pub use style_config::{AutoprefixOptions, RemOptions, StyleConfig};
pub use target::{Target, TargetDescriptor};

use cml_markup::Document;

/// Options for [`compile`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    pub target: Target,
    /// Style options; web passes them to the style proxy.
    pub style: Option<StyleConfig>,
}

impl CompileOptions {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            style: None,
        }
    }

    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = Some(style);
        self
    }
}

/// Parse a template, rewrite it for `options.target` and print it back.
pub fn compile(source: &str, options: &CompileOptions) -> TransformResult<String> {
    let mut doc = cml_markup::parse(source)?;
    let ctx = TransformContext::new(options.target).with_style(options.style.as_ref());
    transform_document(&mut doc, &ctx)?;
    Ok(cml_markup::print(&doc))
}

/// Run the standard pipeline over a parsed document.
pub fn transform_document(doc: &mut Document, ctx: &TransformContext<'_>) -> TransformResult<()> {
    tracing::debug!(platform = %ctx.target(), nodes = doc.len(), "transforming template");
    Pipeline::standard().run(doc, ctx)
}

#[cfg(test)]
pub(crate) fn transform_with_context(
    pass: &dyn TransformPass,
    source: &str,
    ctx: &TransformContext<'_>,
) -> TransformResult<String> {
    let mut doc = cml_markup::parse(source)?;
    run_pass(pass, &mut doc, ctx)?;
    Ok(cml_markup::print(&doc))
}

#[cfg(test)]
pub(crate) fn transform_with(
    pass: &dyn TransformPass,
    source: &str,
    target: Target,
) -> TransformResult<String> {
    transform_with_context(pass, source, &TransformContext::new(target))
}
