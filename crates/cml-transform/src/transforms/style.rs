//! Static style normalization and dynamic style proxies.

use cml_markup::{Attributes, Document, NodeId};

use super::interpolation_to_js;
use crate::context::TransformContext;
use crate::directive::{find_all, Directive, DirectiveKind};
use crate::error::TransformResult;
use crate::pipeline::TransformPass;
use crate::style_config::StyleConfig;
use crate::target::{StyleMode, STYLE_PROXY};

#[derive(Debug, Clone, Copy, Default)]
pub struct StylePass;

/// Attribute holding the merged dynamic style on web-like targets.
const STYLE_BINDING: &str = "v-bind:style";

/// Merge every style binding into one proxied `v-bind:style`, placed where the
/// first binding was.
fn proxy_bindings(
    attrs: &mut Attributes,
    bindings: &[Directive],
    mode: StyleMode,
    config: Option<&StyleConfig>,
) {
    let parts: Vec<String> = bindings
        .iter()
        .map(|b| b.expression().trim())
        .filter(|expr| !expr.is_empty())
        .map(|expr| {
            if expr.contains("{{") {
                interpolation_to_js(expr)
            } else {
                expr.to_string()
            }
        })
        .collect();

    let proxy_call = format!("{}(", STYLE_PROXY);
    if bindings.len() == 1 && parts.len() == 1 && parts[0].starts_with(&proxy_call) {
        return;
    }

    let (first, rest) = match bindings.split_first() {
        Some(split) => split,
        None => return,
    };
    for binding in rest {
        attrs.remove(&binding.name);
    }
    if parts.is_empty() {
        attrs.remove(&first.name);
        return;
    }

    let expr = if parts.len() == 1 {
        parts[0].clone()
    } else {
        parts
            .iter()
            .map(|part| format!("({})", part))
            .collect::<Vec<_>>()
            .join("+';'+")
    };
    let wrapped = match (mode, config) {
        (StyleMode::ProxyWithConfig, Some(config)) => {
            format!("{}(({}),{})", STYLE_PROXY, expr, config.to_js_literal())
        }
        _ => format!("{}(({}))", STYLE_PROXY, expr),
    };
    attrs.replace_with(&first.name, [(STYLE_BINDING, Some(wrapped))]);
}

impl TransformPass for StylePass {
    fn name(&self) -> &'static str {
        "style"
    }

    fn transform_element(
        &self,
        doc: &mut Document,
        id: NodeId,
        ctx: &TransformContext<'_>,
    ) -> TransformResult<()> {
        let Some(el) = doc.element_mut(id) else {
            return Ok(());
        };

        let bindings = find_all(&el.attrs, DirectiveKind::StyleBinding);
        match ctx.descriptor.style {
            StyleMode::Drop => {
                for binding in &bindings {
                    tracing::warn!(
                        tag = %el.tag,
                        binding = %binding.name,
                        platform = %ctx.target(),
                        "dynamic style is not supported on this target; binding dropped"
                    );
                    el.attrs.remove(&binding.name);
                }
            }
            mode if !bindings.is_empty() => {
                proxy_bindings(&mut el.attrs, &bindings, mode, ctx.style);
            }
            _ => {}
        }

        if let Some(current) = el.attrs.get("style").filter(|v| !v.trim().is_empty()) {
            let normalized = ctx.normalize_style(current);
            if normalized != current {
                tracing::debug!(tag = %el.tag, style = %normalized, "normalized static style");
                el.attrs.insert("style", normalized);
            }
        }
        Ok(())
    }
}
