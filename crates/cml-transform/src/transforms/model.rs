//! `v-model` two-way bindings.

use cml_markup::{Document, NodeId};

use crate::context::TransformContext;
use crate::directive::{find, DirectiveKind};
use crate::error::TransformResult;
use crate::js::js_string;
use crate::pipeline::TransformPass;
use crate::target::{ModelAttrs, ValueEncoding, MODEL_PROXY};

/// Native controls and components get the same treatment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelPass;

impl TransformPass for ModelPass {
    fn name(&self) -> &'static str {
        "model"
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
        let Some(model) = find(&el.attrs, DirectiveKind::Model) else {
            return Ok(());
        };

        let key = model.expression().trim().to_string();
        if key.is_empty() {
            tracing::warn!(tag = %el.tag, "v-model without an expression removed");
            el.attrs.remove(&model.name);
            return Ok(());
        }
        if !model.modifiers.is_empty() {
            tracing::warn!(tag = %el.tag, modifiers = ?model.modifiers, "v-model modifiers are ignored");
        }

        let replacement = match ctx.descriptor.model {
            ModelAttrs::EventProxy {
                event_attr,
                value_attr,
            } => vec![
                (
                    event_attr,
                    Some(format!("{}($event,{})", MODEL_PROXY, js_string(&key))),
                ),
                (value_attr, Some(key)),
            ],
            ModelAttrs::DataKey {
                key_attr,
                event_attr,
                value_attr,
            } => vec![
                (key_attr, Some(key.clone())),
                (event_attr, Some(MODEL_PROXY.to_string())),
                (value_attr, Some(ValueEncoding::Braces.encode(&key))),
            ],
        };
        tracing::debug!(tag = %el.tag, key = %model.expression().trim(), "rewrite v-model");
        el.attrs.replace_with(&model.name, replacement);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;
    use crate::transform_with;
    use pretty_assertions::assert_eq;

    const SOURCE: &str =
        r#"<view><input v-model="searchText" /><custom-input v-model="search"></custom-input></view>"#;

    fn run(source: &str, target: Target) -> String {
        transform_with(&ModelPass, source, target).unwrap()
    }

    #[test]
    fn test_web_like_model() {
        for target in [Target::Web, Target::Weex] {
            assert_eq!(
                run(SOURCE, target),
                r#"<view><input v-on:input="_cmlModelEventProxy($event,'searchText')" v-bind:value="searchText" /><custom-input v-on:input="_cmlModelEventProxy($event,'search')" v-bind:value="search"></custom-input></view>"#
            );
        }
    }

    #[test]
    fn test_miniapp_model() {
        let lower = r#"<view><input data-modelkey="searchText" bindinput="_cmlModelEventProxy" value="{{searchText}}" /><custom-input data-modelkey="search" bindinput="_cmlModelEventProxy" value="{{search}}"></custom-input></view>"#;
        assert_eq!(run(SOURCE, Target::Wx), lower);
        assert_eq!(run(SOURCE, Target::Baidu), lower);
        assert_eq!(
            run(SOURCE, Target::Alipay),
            r#"<view><input data-modelkey="searchText" bindInput="_cmlModelEventProxy" value="{{searchText}}" /><custom-input data-modelkey="search" bindInput="_cmlModelEventProxy" value="{{search}}"></custom-input></view>"#
        );
    }

    #[test]
    fn test_model_keeps_attribute_position() {
        assert_eq!(
            run(r#"<input type="text" v-model="q" placeholder="find" />"#, Target::Wx),
            r#"<input type="text" data-modelkey="q" bindinput="_cmlModelEventProxy" value="{{q}}" placeholder="find" />"#
        );
    }

    #[test]
    fn test_model_key_is_quoted() {
        assert_eq!(
            run(r#"<input v-model="form['name']" />"#, Target::Web),
            r#"<input v-on:input="_cmlModelEventProxy($event,'form[\'name\']')" v-bind:value="form['name']" />"#
        );
    }

    #[test]
    fn test_modifiers_dropped() {
        assert_eq!(
            run(r#"<input v-model.trim="q" />"#, Target::Alipay),
            r#"<input data-modelkey="q" bindInput="_cmlModelEventProxy" value="{{q}}" />"#
        );
    }

    #[test]
    fn test_empty_model_removed() {
        assert_eq!(run(r#"<input v-model="" />"#, Target::Wx), r#"<input />"#);
    }
}
