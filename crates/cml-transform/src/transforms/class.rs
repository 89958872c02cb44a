//! Static class, class binding and framework base classes.

use cml_markup::{Attributes, Document, NodeId};

use crate::context::TransformContext;
use crate::directive::{find, Directive, DirectiveKind};
use crate::error::TransformResult;
use crate::pipeline::TransformPass;
use crate::target::{ClassMode, ValueEncoding, BASE_CLASS, WEEX_CLASS_PROXY};

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassPass;

/// `cml-base cml-<tag>`
fn base_classes(tag: &str) -> String {
    format!("{} cml-{}", BASE_CLASS, tag)
}

/// A class list that already went through this pass ends with the base
/// classes of its tag, in order.
fn is_merged(static_class: &str, base: &str) -> bool {
    let tokens: Vec<&str> = static_class.split_whitespace().collect();
    let base: Vec<&str> = base.split_whitespace().collect();
    tokens.ends_with(&base)
}

/// Keep static class and binding apart; the static list gains the base classes.
fn merge_static(attrs: &mut Attributes, binding: Option<&Directive>, base: &str) {
    let static_class = attrs.get("class").unwrap_or("");
    if is_merged(static_class, base) {
        return;
    }
    // `class="a" :class="b"` -> `a   cml-base cml-<tag>`; without a binding
    // the separator is a single space.
    let value = match binding {
        Some(_) => format!("{}   {}", static_class, base),
        None => format!("{} {}", static_class, base),
    };
    match binding {
        Some(binding) if !attrs.contains("class") => {
            attrs.insert_before(&binding.name, "class", value)
        }
        _ => attrs.insert("class", value),
    }
}

/// Fold binding, static list and base classes into one interpolated class.
fn fold(attrs: &mut Attributes, binding: Option<&Directive>, base: &str) {
    let static_class = attrs.get("class").unwrap_or("");
    let merged = is_merged(static_class, base);
    // `{{b}} a  cml-base cml-<tag>`: the static list and the base classes
    // are separated by two spaces.
    let value = match (binding, merged) {
        (Some(b), false) => format!(
            "{} {}  {}",
            ValueEncoding::Braces.encode(b.expression()),
            static_class,
            base
        ),
        (None, false) => format!("{} {}", static_class, base),
        (Some(b), true) => format!("{} {}", ValueEncoding::Braces.encode(b.expression()), static_class),
        (None, true) => return,
    };

    match binding {
        Some(binding) if !attrs.contains("class") => {
            attrs.replace_with(&binding.name, [("class", Some(value))]);
        }
        Some(binding) => {
            attrs.insert("class", value);
            attrs.remove(&binding.name);
        }
        None => attrs.insert("class", value),
    }
}

impl TransformPass for ClassPass {
    fn name(&self) -> &'static str {
        "class"
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
        let base = base_classes(&el.tag);
        let binding = find(&el.attrs, DirectiveKind::ClassBinding);

        match ctx.descriptor.class {
            ClassMode::Static => merge_static(&mut el.attrs, binding.as_ref(), &base),
            ClassMode::WeexProxy => {
                merge_static(&mut el.attrs, binding.as_ref(), &base);
                if let Some(binding) = &binding {
                    let expr = binding.expression().trim();
                    if !expr.starts_with(&format!("{}(", WEEX_CLASS_PROXY)) {
                        let wrapped = format!("{}(({}))", WEEX_CLASS_PROXY, expr);
                        el.attrs.insert(binding.name.clone(), wrapped);
                    }
                }
            }
            ClassMode::Fold => fold(&mut el.attrs, binding.as_ref(), &base),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::run_pass;
    use crate::target::Target;
    use crate::transform_with;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"<view><view class="cls1 cls2" v-bind:class="true?'cls3':'cls4'"></view></view>"#;

    fn run(source: &str, target: Target) -> String {
        transform_with(&ClassPass, source, target).unwrap()
    }

    #[test]
    fn test_web_class() {
        assert_eq!(
            run(SOURCE, Target::Web),
            r#"<view class=" cml-base cml-view"><view class="cls1 cls2   cml-base cml-view" v-bind:class="true?'cls3':'cls4'"></view></view>"#
        );
    }

    #[test]
    fn test_weex_class() {
        assert_eq!(
            run(SOURCE, Target::Weex),
            r#"<view class=" cml-base cml-view"><view class="cls1 cls2   cml-base cml-view" v-bind:class="_weexClassProxy((true?'cls3':'cls4'))"></view></view>"#
        );
    }

    #[test]
    fn test_miniapp_class_fold() {
        for target in [Target::Wx, Target::Alipay, Target::Baidu] {
            assert_eq!(
                run(SOURCE, target),
                r#"<view class=" cml-base cml-view"><view class="{{true?'cls3':'cls4'}} cls1 cls2  cml-base cml-view"></view></view>"#
            );
        }
    }

    #[test]
    fn test_binding_without_static_class() {
        assert_eq!(
            run(r#"<text :class="c"></text>"#, Target::Web),
            r#"<text class="   cml-base cml-text" :class="c"></text>"#
        );
        assert_eq!(
            run(r#"<text id="t" :class="c"></text>"#, Target::Wx),
            r#"<text id="t" class="{{c}}   cml-base cml-text"></text>"#
        );
    }

    #[test]
    fn test_author_base_class_still_gets_tag_class() {
        assert_eq!(
            run(r#"<view class="cml-base"></view>"#, Target::Web),
            r#"<view class="cml-base cml-base cml-view"></view>"#
        );
        assert_eq!(
            run(r#"<view class="cml-base" :class="c"></view>"#, Target::Wx),
            r#"<view class="{{c}} cml-base  cml-base cml-view"></view>"#
        );
        assert!(!is_merged("cml-view cml-base", "cml-base cml-view"));
        assert!(is_merged("a   cml-base cml-view", "cml-base cml-view"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        for target in Target::ALL {
            let ctx = crate::TransformContext::new(target);
            let mut doc = cml_markup::parse(SOURCE).unwrap();
            run_pass(&ClassPass, &mut doc, &ctx).unwrap();
            let once = cml_markup::print(&doc);
            run_pass(&ClassPass, &mut doc, &ctx).unwrap();
            assert_eq!(cml_markup::print(&doc), once, "{target}");
        }
    }
}
