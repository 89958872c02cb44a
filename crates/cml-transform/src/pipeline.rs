//! Ordered transformer passes.

use cml_markup::{Document, NodeId};

use crate::context::TransformContext;
use crate::error::TransformResult;
use crate::transforms::{
    BindingPass, ClassPass, ConditionalPass, IterationPass, ModelPass, RefPass, StylePass,
};

/// One directive rewrite applied to every element of a document.
pub trait TransformPass: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Rewrite the element at `id`. Only the element's attributes are mutated;
    /// the tree shape is left alone.
    fn transform_element(
        &self,
        doc: &mut Document,
        id: NodeId,
        ctx: &TransformContext<'_>,
    ) -> TransformResult<()>;
}

/// Run `pass` over every element of `doc` in document order.
pub fn run_pass(
    pass: &dyn TransformPass,
    doc: &mut Document,
    ctx: &TransformContext<'_>,
) -> TransformResult<()> {
    for id in doc.preorder() {
        if doc.element(id).is_some() {
            pass.transform_element(doc, id, ctx)?;
        }
    }
    Ok(())
}

/// An ordered list of passes.
pub struct Pipeline {
    passes: Vec<Box<dyn TransformPass>>,
}

impl Pipeline {
    /// The default pass order.
    ///
    /// `ref` runs first so the identity attribute and marker class exist before
    /// class folding; model, binding and show run before class and style so
    /// every attribute they emit is already in place when those merge.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(RefPass),
            Box::new(ModelPass),
            Box::new(BindingPass),
            Box::new(ConditionalPass),
            Box::new(IterationPass),
            Box::new(ClassPass),
            Box::new(StylePass),
        ])
    }

    pub fn new(passes: Vec<Box<dyn TransformPass>>) -> Self {
        Self { passes }
    }

    pub fn passes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(|pass| pass.name())
    }

    /// Apply every pass in order. Stops at the first error.
    pub fn run(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> TransformResult<()> {
        for pass in &self.passes {
            tracing::trace!(pass = pass.name(), platform = %ctx.target(), "running pass");
            run_pass(pass.as_ref(), doc, ctx)?;
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.passes()).finish()
    }
}
