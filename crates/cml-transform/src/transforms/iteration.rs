//! `v-for` expressions.

use cml_markup::{Document, NodeId};

use super::locate;
use crate::context::TransformContext;
use crate::directive::{find, DirectiveKind};
use crate::error::{TransformError, TransformResult};
use crate::pipeline::TransformPass;
use crate::target::IterationAttrs;

/// Index alias used when the expression names none.
pub const DEFAULT_INDEX: &str = "index";

/// A parsed `alias in source` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationExpr {
    /// `item`, `(item, index)` or `(value, key, index)` aliases in order.
    /// A destructuring pattern such as `{ id, name }` is kept as one alias.
    pub aliases: Vec<String>,
    pub source: String,
}

impl IterationExpr {
    pub fn item(&self) -> &str {
        self.aliases.first().map_or("", String::as_str)
    }

    /// The index alias, defaulting to `index`.
    pub fn index(&self) -> &str {
        self.aliases.get(1).map_or(DEFAULT_INDEX, String::as_str)
    }

    /// Whether every alias is a plain identifier.
    pub fn has_simple_aliases(&self) -> bool {
        self.aliases.iter().all(|alias| is_identifier(alias))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Byte offsets of `text` outside brackets and string literals, paired
/// with their characters.
fn top_level(text: &str) -> Vec<(usize, char)> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push((i, c)),
            _ => {}
        }
    }
    out
}

/// Position of the first top-level `in` / `of` keyword. It must follow
/// whitespace or a closing bracket and be followed by whitespace.
fn find_keyword(expression: &str) -> Option<(usize, usize)> {
    let bytes = expression.as_bytes();
    for (i, _) in top_level(expression) {
        let word = match expression.get(i..i + 2) {
            Some(word @ ("in" | "of")) => word,
            _ => continue,
        };
        let before = expression[..i].chars().next_back();
        let after = bytes.get(i + word.len()).copied();
        let opens = matches!(before, Some(c) if c.is_whitespace() || matches!(c, ')' | ']' | '}'));
        let closes = matches!(after, Some(b) if b.is_ascii_whitespace());
        if opens && closes {
            return Some((i, i + word.len()));
        }
    }
    None
}

/// Split an alias list on top-level commas.
fn split_aliases(list: &str) -> Vec<String> {
    let mut aliases = Vec::new();
    let mut start = 0;
    for (i, c) in top_level(list) {
        if c == ',' {
            aliases.push(list[start..i].trim().to_string());
            start = i + 1;
        }
    }
    aliases.push(list[start..].trim().to_string());
    aliases
}

/// Parse `item in list`, `(item, i) in list`, `{ id } in list` or the same
/// with `of`.
pub fn parse_iteration(expression: &str) -> Option<IterationExpr> {
    let (kw_start, kw_end) = find_keyword(expression)?;
    let alias = expression[..kw_start].trim();
    let source = expression[kw_end..].trim();
    if alias.is_empty() || source.is_empty() {
        return None;
    }

    let aliases = match alias.strip_prefix('(').and_then(|a| a.strip_suffix(')')) {
        Some(list) => split_aliases(list),
        None => vec![alias.to_string()],
    };
    if aliases.iter().any(String::is_empty) {
        return None;
    }
    Some(IterationExpr {
        aliases,
        source: source.to_string(),
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IterationPass;

impl TransformPass for IterationPass {
    fn name(&self) -> &'static str {
        "iteration"
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
        let Some(dir) = find(&el.attrs, DirectiveKind::For) else {
            return Ok(());
        };

        let syntax_error = || TransformError::IterationSyntax {
            tag: tag.clone(),
            expression: dir.expression().to_string(),
            span,
        };
        let parsed = parse_iteration(dir.expression()).ok_or_else(syntax_error)?;

        match ctx.descriptor.iteration {
            IterationAttrs::Keep => {}
            IterationAttrs::Split { .. }
                if parsed.aliases.len() > 2 || !parsed.has_simple_aliases() =>
            {
                return Err(syntax_error());
            }
            IterationAttrs::Split {
                item_attr,
                index_attr,
                source_attr,
                encoding,
            } => {
                tracing::debug!(tag = %tag, item = parsed.item(), index = parsed.index(), "split v-for");
                el.attrs.replace_with(
                    &dir.name,
                    [
                        (item_attr, Some(parsed.item().to_string())),
                        (index_attr, Some(parsed.index().to_string())),
                        (source_attr, Some(encoding.encode(&parsed.source))),
                    ],
                );
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

    const NESTED: &str = r#"<view v-for="(m,i) in array"><view v-for="item in array"></view></view>"#;

    fn run(source: &str, target: Target) -> TransformResult<String> {
        transform_with(&IterationPass, source, target)
    }

    #[test]
    fn test_parse_forms() {
        let parsed = parse_iteration("(m, i) in array").unwrap();
        assert_eq!(parsed.item(), "m");
        assert_eq!(parsed.index(), "i");
        assert_eq!(parsed.source, "array");

        let parsed = parse_iteration("item of list.items").unwrap();
        assert_eq!(parsed.item(), "item");
        assert_eq!(parsed.index(), "index");
        assert_eq!(parsed.source, "list.items");

        let parsed = parse_iteration("(value, key, i) in object").unwrap();
        assert_eq!(parsed.aliases, vec!["value", "key", "i"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_iteration("array"), None);
        assert_eq!(parse_iteration("item array"), None);
        assert_eq!(parse_iteration("() in array"), None);
        assert_eq!(parse_iteration("(m,) in array"), None);
        assert_eq!(parse_iteration("item in "), None);
    }

    #[test]
    fn test_parse_destructuring_and_tight_spacing() {
        let parsed = parse_iteration("{ id, name } in list").unwrap();
        assert_eq!(parsed.aliases, vec!["{ id, name }"]);
        assert_eq!(parsed.source, "list");
        assert!(!parsed.has_simple_aliases());

        let parsed = parse_iteration("({ id }, i) of list").unwrap();
        assert_eq!(parsed.aliases, vec!["{ id }", "i"]);

        let parsed = parse_iteration("(item, i)in list").unwrap();
        assert_eq!(parsed.aliases, vec!["item", "i"]);
        assert_eq!(parsed.source, "list");

        let parsed = parse_iteration("index in indexes").unwrap();
        assert_eq!(parsed.item(), "index");
        assert_eq!(parsed.source, "indexes");
    }

    #[test]
    fn test_destructuring_kept_on_web() {
        let source = r#"<view v-for="{ id, name } in list"></view>"#;
        for target in [Target::Web, Target::Weex] {
            assert_eq!(run(source, target).unwrap(), source);
        }
        let err = run(source, Target::Wx).unwrap_err();
        assert_eq!(err.code(), "invalid-v-for");
    }

    #[test]
    fn test_tight_spacing_split_on_miniapp() {
        assert_eq!(
            run(r#"<view v-for="(item, i)in list"></view>"#, Target::Wx).unwrap(),
            r#"<view wx:for-item="item" wx:for-index="i" wx:for="{{list}}"></view>"#
        );
    }

    #[test]
    fn test_miniapp_split() {
        assert_eq!(
            run(NESTED, Target::Wx).unwrap(),
            r#"<view wx:for-item="m" wx:for-index="i" wx:for="{{array}}"><view wx:for-item="item" wx:for-index="index" wx:for="{{array}}"></view></view>"#
        );
        assert_eq!(
            run(NESTED, Target::Alipay).unwrap(),
            r#"<view a:for-item="m" a:for-index="i" a:for="{{array}}"><view a:for-item="item" a:for-index="index" a:for="{{array}}"></view></view>"#
        );
        assert_eq!(
            run(NESTED, Target::Baidu).unwrap(),
            r#"<view s-for-item="m" s-for-index="i" s-for="array"><view s-for-item="item" s-for-index="index" s-for="array"></view></view>"#
        );
    }

    #[test]
    fn test_web_keeps_v_for() {
        assert_eq!(run(NESTED, Target::Web).unwrap(), NESTED);
        let source = r#"<view v-for="(v, k, i) in obj"></view>"#;
        assert_eq!(run(source, Target::Weex).unwrap(), source);
    }

    #[test]
    fn test_malformed_expression() {
        for target in Target::ALL {
            let err = run(r#"<view v-for="array"></view>"#, target).unwrap_err();
            match err {
                TransformError::IterationSyntax { tag, expression, .. } => {
                    assert_eq!(tag, "view");
                    assert_eq!(expression, "array");
                }
                other => panic!("Expected iteration error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_three_aliases_rejected_on_miniapp() {
        let err = run(r#"<view v-for="(v, k, i) in obj"></view>"#, Target::Wx).unwrap_err();
        assert_eq!(err.code(), "invalid-v-for");
    }
}
