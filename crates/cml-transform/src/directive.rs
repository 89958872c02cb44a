//! Directive meanings derived from attribute names.
//!
//! Directives are never stored on their own; passes derive them from an
//! element's attribute map when they need them.

use cml_markup::Attributes;
use smol_str::SmolStr;

/// The meaning of a directive attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `ref`
    Ref,
    /// `v-if`
    If,
    /// `v-else-if`
    ElseIf,
    /// `v-else`
    Else,
    /// `v-for`
    For,
    /// `v-bind:prop` / `:prop` for any prop other than class and style.
    Bind,
    /// `v-model`
    Model,
    /// `v-show`
    Show,
    /// Static `class`.
    Class,
    /// `v-bind:class` / `:class`
    ClassBinding,
    /// Static `style`.
    Style,
    /// `v-bind:style` / `:style`
    StyleBinding,
}

/// A directive read off one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// The attribute name as written.
    pub name: SmolStr,
    /// Argument, e.g. `prop` in `v-bind:prop`.
    pub arg: Option<SmolStr>,
    /// Modifiers, e.g. `trim` in `v-model.trim`.
    pub modifiers: Vec<SmolStr>,
    /// The raw expression; `None` for a bare attribute.
    pub value: Option<String>,
}

impl Directive {
    /// Derive a directive from an attribute, or `None` for a plain attribute.
    pub fn from_attr(name: &str, value: Option<&str>) -> Option<Self> {
        let (kind, arg, modifiers) = match name {
            "ref" => (DirectiveKind::Ref, None, Vec::new()),
            "class" => (DirectiveKind::Class, None, Vec::new()),
            "style" => (DirectiveKind::Style, None, Vec::new()),
            _ => {
                if let Some(rest) = name.strip_prefix("v-bind:").or_else(|| name.strip_prefix(':')) {
                    let (arg, modifiers) = split_modifiers(rest);
                    // Dynamic names (`:[key]`) have no static counterpart.
                    if arg.is_empty() || arg.starts_with('[') {
                        return None;
                    }
                    let kind = match arg {
                        "class" => DirectiveKind::ClassBinding,
                        "style" => DirectiveKind::StyleBinding,
                        _ => DirectiveKind::Bind,
                    };
                    (kind, Some(SmolStr::from(arg)), modifiers)
                } else if let Some(rest) = name.strip_prefix("v-") {
                    let (base, modifiers) = split_modifiers(rest);
                    let kind = match base {
                        "if" => DirectiveKind::If,
                        "else-if" => DirectiveKind::ElseIf,
                        "else" => DirectiveKind::Else,
                        "for" => DirectiveKind::For,
                        "model" => DirectiveKind::Model,
                        "show" => DirectiveKind::Show,
                        _ => return None,
                    };
                    (kind, None, modifiers)
                } else {
                    return None;
                }
            }
        };

        Some(Self {
            kind,
            name: name.into(),
            arg,
            modifiers,
            value: value.map(str::to_string),
        })
    }

    /// The expression text; bare directives read as empty.
    pub fn expression(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn is_bare(&self) -> bool {
        self.value.is_none()
    }
}

fn split_modifiers(s: &str) -> (&str, Vec<SmolStr>) {
    let mut parts = s.split('.');
    let base = parts.next().unwrap_or_default();
    (base, parts.map(SmolStr::from).collect())
}

/// All directives on an element, in attribute order.
pub fn directives(attrs: &Attributes) -> Vec<Directive> {
    attrs
        .iter()
        .filter_map(|(name, value)| Directive::from_attr(name, value))
        .collect()
}

/// All directives of one kind, in attribute order.
pub fn find_all(attrs: &Attributes, kind: DirectiveKind) -> Vec<Directive> {
    directives(attrs)
        .into_iter()
        .filter(|d| d.kind == kind)
        .collect()
}

/// The first directive of `kind`.
pub fn find(attrs: &Attributes, kind: DirectiveKind) -> Option<Directive> {
    attrs
        .iter()
        .filter_map(|(name, value)| Directive::from_attr(name, value))
        .find(|d| d.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(name: &str) -> Option<DirectiveKind> {
        Directive::from_attr(name, Some("x")).map(|d| d.kind)
    }

    #[test]
    fn test_directive_kinds() {
        assert_eq!(kind("ref"), Some(DirectiveKind::Ref));
        assert_eq!(kind("v-if"), Some(DirectiveKind::If));
        assert_eq!(kind("v-else-if"), Some(DirectiveKind::ElseIf));
        assert_eq!(kind("v-else"), Some(DirectiveKind::Else));
        assert_eq!(kind("v-for"), Some(DirectiveKind::For));
        assert_eq!(kind("v-model"), Some(DirectiveKind::Model));
        assert_eq!(kind("v-show"), Some(DirectiveKind::Show));
        assert_eq!(kind("class"), Some(DirectiveKind::Class));
        assert_eq!(kind("style"), Some(DirectiveKind::Style));
        assert_eq!(kind("v-bind:class"), Some(DirectiveKind::ClassBinding));
        assert_eq!(kind(":style"), Some(DirectiveKind::StyleBinding));
        assert_eq!(kind(":prop"), Some(DirectiveKind::Bind));
    }

    #[test]
    fn test_plain_attributes() {
        assert_eq!(kind("prop1"), None);
        assert_eq!(kind("wx:if"), None);
        assert_eq!(kind("v-on:input"), None);
        assert_eq!(kind(":[dynamic]"), None);
    }

    #[test]
    fn test_arg_and_modifiers() {
        let dir = Directive::from_attr("v-bind:prop2.sync", Some("dynamic")).unwrap();
        assert_eq!(dir.arg.as_deref(), Some("prop2"));
        assert_eq!(dir.modifiers, vec![SmolStr::from("sync")]);
        assert_eq!(dir.expression(), "dynamic");

        let model = Directive::from_attr("v-model.trim", Some("q")).unwrap();
        assert_eq!(model.kind, DirectiveKind::Model);
        assert_eq!(model.modifiers, vec![SmolStr::from("trim")]);
    }

    #[test]
    fn test_bare_directive() {
        let dir = Directive::from_attr("v-else", None).unwrap();
        assert!(dir.is_bare());
        assert_eq!(dir.expression(), "");
    }

    #[test]
    fn test_find() {
        let attrs: Attributes = [("prop1", "static"), ("v-bind:prop2", "a"), (":prop3", "b")]
            .into_iter()
            .collect();
        assert_eq!(find(&attrs, DirectiveKind::Bind).unwrap().name, "v-bind:prop2");
        assert_eq!(find_all(&attrs, DirectiveKind::Bind).len(), 2);
        assert!(find(&attrs, DirectiveKind::Model).is_none());
    }
}
