//! `ref` handling.

use cml_markup::{Document, NodeId};

use super::append_class_token;
use crate::context::TransformContext;
use crate::error::TransformResult;
use crate::pipeline::TransformPass;
use crate::target::RefAttrs;

/// Turns `ref="name"` into an identity attribute plus marker class on targets
/// without component refs; drops it elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefPass;

impl TransformPass for RefPass {
    fn name(&self) -> &'static str {
        "ref"
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
        let Some(name) = el.attrs.get("ref").map(|v| v.trim().to_string()) else {
            return Ok(());
        };

        match ctx.descriptor.reference {
            RefAttrs::Drop => {
                el.attrs.remove("ref");
            }
            RefAttrs::Identity { .. } if name.is_empty() => {
                tracing::warn!(tag = %el.tag, "empty ref removed");
                el.attrs.remove("ref");
            }
            RefAttrs::Identity {
                id_attr,
                marker_class,
            } => {
                if let Some(previous) = el.attrs.get(id_attr) {
                    tracing::warn!(
                        tag = %el.tag,
                        previous,
                        replacement = %name,
                        "ref overwrites existing {}",
                        id_attr
                    );
                }
                el.attrs.replace_with("ref", [(id_attr, Some(name))]);
                append_class_token(&mut el.attrs, marker_class);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;
    use crate::transform_with;
    use pretty_assertions::assert_eq;

    fn run(source: &str, target: Target) -> String {
        transform_with(&RefPass, source, target).unwrap()
    }

    #[test]
    fn test_miniapp_ref() {
        for target in [Target::Wx, Target::Alipay, Target::Baidu] {
            assert_eq!(
                run(r#"<view ref="flag"></view>"#, target),
                r#"<view id="flag" class="_cml_ref_lmc_"></view>"#
            );
        }
    }

    #[test]
    fn test_ref_appends_to_existing_class() {
        assert_eq!(
            run(r#"<view class="a" ref="flag"></view>"#, Target::Wx),
            r#"<view class="a _cml_ref_lmc_" id="flag"></view>"#
        );
    }

    #[test]
    fn test_ref_overwrites_id() {
        assert_eq!(
            run(r#"<view id="old" ref="flag"></view>"#, Target::Alipay),
            r#"<view id="flag" class="_cml_ref_lmc_"></view>"#
        );
    }

    #[test]
    fn test_ref_dropped_on_web_like_targets() {
        for target in [Target::Web, Target::Weex] {
            assert_eq!(
                run(r#"<view ref="flag" class="a"></view>"#, target),
                r#"<view class="a"></view>"#
            );
        }
    }

    #[test]
    fn test_no_ref_is_noop() {
        assert_eq!(run(r#"<view class="a"></view>"#, Target::Wx), r#"<view class="a"></view>"#);
    }
}
