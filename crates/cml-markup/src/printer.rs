//! Serialize a [`Document`] back to template source.

use crate::ast::*;

/// Print a document as template markup.
pub fn print(doc: &Document) -> String {
    let mut out = String::new();
    for &root in doc.roots() {
        print_node(doc, root, &mut out);
    }
    out
}

fn print_node(doc: &Document, id: NodeId, out: &mut String) {
    match &doc.node(id).kind {
        NodeKind::Text(content) => out.push_str(content),
        NodeKind::Comment(content) => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in el.attrs.iter() {
                out.push(' ');
                out.push_str(name);
                if let Some(value) = value {
                    out.push_str("=\"");
                    push_escaped(value, out);
                    out.push('"');
                }
            }
            match el.closing {
                Closing::SelfClosing => out.push_str(" />"),
                Closing::Void => out.push('>'),
                Closing::Normal => {
                    out.push('>');
                    for &child in doc.children(id) {
                        print_node(doc, child, out);
                    }
                    out.push_str("</");
                    out.push_str(&el.tag);
                    out.push('>');
                }
            }
        }
    }
}

fn push_escaped(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn roundtrip(source: &str) -> String {
        print(&parse(source).unwrap())
    }

    #[test]
    fn test_print_preserves_markup() {
        let source = r#"<view class="a"><!-- c --><text>{{ msg }}</text><input v-model="x" /></view>"#;
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn test_print_normalizes_start_tag_whitespace() {
        assert_eq!(
            roundtrip("<view ><view   style='color:red'  ></view></view>"),
            r#"<view><view style="color:red"></view></view>"#
        );
    }

    #[test]
    fn test_print_bare_and_void() {
        assert_eq!(roundtrip("<view v-else><br></view>"), "<view v-else><br></view>");
    }

    #[test]
    fn test_print_escapes_double_quotes() {
        assert_eq!(
            roundtrip(r#"<view title='say "hi"'></view>"#),
            r#"<view title="say &quot;hi&quot;"></view>"#
        );
    }
}
