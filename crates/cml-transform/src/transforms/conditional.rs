//! `v-if` / `v-else-if` / `v-else` chains.

use cml_markup::{Attributes, Document, NodeId};

use super::locate;
use crate::context::TransformContext;
use crate::directive::{directives, DirectiveKind};
use crate::error::{TransformError, TransformResult};
use crate::pipeline::TransformPass;
use crate::target::ConditionalAttrs;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalPass;

/// Whether an already rewritten element opens or continues a chain.
fn continues_chain(attrs: &Attributes, names: &ConditionalAttrs) -> bool {
    attrs.contains(names.if_attr) || attrs.contains(names.else_if_attr)
}

impl TransformPass for ConditionalPass {
    fn name(&self) -> &'static str {
        "conditional"
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
        let names = &ctx.descriptor.conditional;

        let mut found = doc
            .element(id)
            .map(|el| directives(&el.attrs))
            .unwrap_or_default()
            .into_iter()
            .filter(|d| {
                matches!(
                    d.kind,
                    DirectiveKind::If | DirectiveKind::ElseIf | DirectiveKind::Else
                )
            });
        let Some(dir) = found.next() else {
            return Ok(());
        };
        if let Some(other) = found.next() {
            return Err(TransformError::ConflictingDirective {
                tag,
                first: dir.name,
                second: other.name,
                span,
            });
        }

        let target_name = match dir.kind {
            DirectiveKind::If => names.if_attr,
            DirectiveKind::ElseIf => names.else_if_attr,
            _ => names.else_attr,
        };

        if dir.kind != DirectiveKind::If {
            // The previous sibling was visited first, so it already carries the
            // target's attribute names.
            let chained = doc
                .previous_element_sibling(id)
                .and_then(|prev| doc.element(prev))
                .is_some_and(|prev| continues_chain(&prev.attrs, names));
            if !chained {
                return Err(TransformError::Chain {
                    tag,
                    directive: dir.name,
                    span,
                });
            }
        }

        let value = dir.value.as_deref().map(|v| names.encoding.encode(v));
        tracing::debug!(tag = %tag, from = %dir.name, to = target_name, "rewrite conditional");
        if let Some(el) = doc.element_mut(id) {
            el.attrs.replace_with(&dir.name, [(target_name, value)]);
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

    const CHAIN: &str =
        r#"<view><view v-if="true"></view><view v-else-if="true"></view><view v-else="true"></view></view>"#;

    fn run(source: &str, target: Target) -> TransformResult<String> {
        transform_with(&ConditionalPass, source, target)
    }

    #[test]
    fn test_miniapp_chain() {
        assert_eq!(
            run(CHAIN, Target::Wx).unwrap(),
            r#"<view><view wx:if="{{true}}"></view><view wx:elif="{{true}}"></view><view wx:else="{{true}}"></view></view>"#
        );
        assert_eq!(
            run(CHAIN, Target::Alipay).unwrap(),
            r#"<view><view a:if="{{true}}"></view><view a:elif="{{true}}"></view><view a:else="{{true}}"></view></view>"#
        );
        assert_eq!(
            run(CHAIN, Target::Baidu).unwrap(),
            r#"<view><view s-if="true"></view><view s-elif="true"></view><view s-else="true"></view></view>"#
        );
    }

    #[test]
    fn test_web_chain_kept() {
        for target in [Target::Web, Target::Weex] {
            assert_eq!(run(CHAIN, target).unwrap(), CHAIN);
        }
    }

    #[test]
    fn test_bare_else_stays_bare() {
        assert_eq!(
            run(r#"<view><text v-if="a"></text>
  <!-- gap -->
  <text v-else></text></view>"#, Target::Wx)
            .unwrap(),
            r#"<view><text wx:if="{{a}}"></text>
  <!-- gap -->
  <text wx:else></text></view>"#
        );
    }

    #[test]
    fn test_else_without_if() {
        for target in Target::ALL {
            let err = run(r#"<view><view></view><view v-else></view></view>"#, target).unwrap_err();
            assert!(matches!(err, TransformError::Chain { .. }), "{target}: {err:?}");
        }
    }

    #[test]
    fn test_else_after_else_breaks_chain() {
        let err = run(
            r#"<view><view v-if="a"></view><view v-else></view><view v-else-if="b"></view></view>"#,
            Target::Wx,
        )
        .unwrap_err();
        match err {
            TransformError::Chain { directive, .. } => assert_eq!(directive, "v-else-if"),
            other => panic!("Expected chain error, got {:?}", other),
        }
    }

    #[test]
    fn test_first_root_else() {
        let err = run(r#"<view v-else></view>"#, Target::Baidu).unwrap_err();
        assert_eq!(err.code(), "directive-chain");
    }

    #[test]
    fn test_two_conditionals_conflict() {
        let err = run(r#"<view v-if="a" v-else></view>"#, Target::Web).unwrap_err();
        assert_eq!(err.code(), "conflicting-directive");
    }
}
