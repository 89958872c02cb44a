//! Directive transformer passes.
//!
//! Each pass rewrites one family of directives on a single element, reading
//! attribute names and encodings from the context's target descriptor.

mod binding;
mod class;
mod conditional;
mod iteration;
mod model;
mod ref_attr;
mod style;

pub use binding::BindingPass;
pub use class::ClassPass;
pub use conditional::ConditionalPass;
pub use iteration::{parse_iteration, IterationExpr, IterationPass};
pub use model::ModelPass;
pub use ref_attr::RefPass;
pub use style::StylePass;

use cml_markup::{Attributes, Document, NodeId, Span};
use smol_str::SmolStr;

use crate::error::{TransformError, TransformResult};
use crate::js::js_string;

/// Tag and span of an element, captured before its attributes are borrowed.
pub(crate) fn locate(doc: &Document, id: NodeId) -> Option<(SmolStr, Span)> {
    let el = doc.element(id)?;
    Some((el.tag.clone(), doc.node(id).span))
}

/// Add `token` to the static class list unless it is already there.
pub(crate) fn append_class_token(attrs: &mut Attributes, token: &str) {
    match attrs.get("class") {
        Some(existing) if existing.split_whitespace().any(|t| t == token) => {}
        Some(existing) if !existing.trim().is_empty() => {
            let value = format!("{} {}", existing.trim_end(), token);
            attrs.insert("class", value);
        }
        _ => attrs.insert("class", token),
    }
}

/// Fail when one binding is written both as `v-bind:x` and `:x`.
pub(crate) fn check_binding_spellings(
    attrs: &Attributes,
    tag: &SmolStr,
    span: Span,
) -> TransformResult<()> {
    for name in attrs.names() {
        let Some(arg) = name.strip_prefix(':') else {
            continue;
        };
        let long = format!("v-bind:{}", arg);
        if attrs.contains(&long) {
            return Err(TransformError::ConflictingDirective {
                tag: tag.clone(),
                first: long.into(),
                second: name.into(),
                span,
            });
        }
    }
    Ok(())
}

/// Style text that hides an element when `expr` is falsy, and removes its
/// layout footprint.
pub(crate) fn show_style_text(expr: &str) -> String {
    format!(
        "display:{{{{{e}?'':'none'}}}};{{{{{e}?'':'height:0px;width:0px;overflow:hidden'}}}}",
        e = expr
    )
}

/// Turn text with `{{ }}` interpolations into a string concatenation
/// expression: `a:{{x}};` becomes `'a:'+(x)+';'`.
pub(crate) fn interpolation_to_js(text: &str) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut first_is_literal = true;
    let mut rest = text;

    while !rest.is_empty() {
        let Some(open) = rest.find("{{") else {
            pieces.push(js_string(rest));
            break;
        };
        let Some(close) = rest[open + 2..].find("}}") else {
            pieces.push(js_string(rest));
            break;
        };
        if open > 0 {
            pieces.push(js_string(&rest[..open]));
        } else if pieces.is_empty() {
            first_is_literal = false;
        }
        let expr = rest[open + 2..open + 2 + close].trim();
        pieces.push(format!("({})", expr));
        rest = &rest[open + 2 + close + 2..];
    }

    if pieces.is_empty() {
        return "''".to_string();
    }
    let joined = pieces.join("+");
    if first_is_literal {
        joined
    } else {
        format!("''+{}", joined)
    }
}
