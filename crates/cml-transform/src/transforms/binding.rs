//! Generic `v-bind:prop` bindings and `v-show`.

use cml_markup::{Document, NodeId};

use super::{check_binding_spellings, locate, show_style_text};
use crate::context::TransformContext;
use crate::directive::{find, find_all, DirectiveKind};
use crate::error::TransformResult;
use crate::pipeline::TransformPass;
use crate::target::{BindingAttrs, ShowSlot};

/// Rewrites prop bindings into the target's dynamic value syntax and turns
/// `v-show` into style text for the style pass to pick up.
///
/// Class and style bindings are left to their own passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingPass;

/// `:style` -> `v-bind:style`
fn long_binding_name(slot: &str) -> String {
    match slot.strip_prefix(':') {
        Some(arg) => format!("v-bind:{}", arg),
        None => slot.to_string(),
    }
}

impl TransformPass for BindingPass {
    fn name(&self) -> &'static str {
        "binding"
    }

    fn transform_element(
        &self,
        doc: &mut Document,
        id: NodeId,
        ctx: &TransformContext<'_>,
    ) -> TransformResult<()> {
        let Some((tag, span)) = locate(doc, id) else {
            return Ok(());
        };
        let Some(el) = doc.element_mut(id) else {
            return Ok(());
        };
        check_binding_spellings(&el.attrs, &tag, span)?;

        if let BindingAttrs::Plain(encoding) = ctx.descriptor.binding {
            for dir in find_all(&el.attrs, DirectiveKind::Bind) {
                let Some(prop) = dir.arg.clone() else {
                    continue;
                };
                if el.attrs.contains(&prop) {
                    tracing::warn!(tag = %tag, prop = %prop, "binding overwrites static attribute");
                }
                let value = dir.value.as_deref().map(|v| encoding.encode(v));
                el.attrs.replace_with(&dir.name, [(prop, value)]);
            }
        }

        let Some(show) = find(&el.attrs, DirectiveKind::Show) else {
            return Ok(());
        };
        let expr = show.expression().trim();
        if expr.is_empty() {
            tracing::warn!(tag = %tag, "v-show without an expression removed");
            el.attrs.remove(&show.name);
            return Ok(());
        }
        let text = show_style_text(expr);

        match ctx.descriptor.show {
            ShowSlot::Binding(slot) => {
                if el.attrs.contains(slot) {
                    // The author's binding moves to its long spelling; the
                    // style pass merges every spelling into one proxy.
                    let long = long_binding_name(slot);
                    tracing::debug!(tag = %tag, from = slot, to = %long, "respelled style binding for v-show");
                    el.attrs.rename(slot, long);
                }
                el.attrs.replace_with(&show.name, [(slot, Some(text))]);
            }
            ShowSlot::Static(slot) => match el.attrs.get(slot).map(str::trim) {
                Some(existing) if !existing.is_empty() => {
                    let merged = format!("{};{}", existing.trim_end_matches(';'), text);
                    el.attrs.insert(slot, merged);
                    el.attrs.remove(&show.name);
                }
                _ => {
                    el.attrs.replace_with(&show.name, [(slot, Some(text))]);
                }
            },
        }
        Ok(())
    }
}
