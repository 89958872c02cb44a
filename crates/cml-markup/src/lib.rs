//! Element tree model for cml templates.
//!
//! This crate turns template source text into a mutable element tree and
//! back. Directive passes mutate element attributes in place between
//! [`parse`] and [`print`].

pub mod ast;
pub mod error;
pub mod parser;
pub mod printer;
pub mod span;

pub use ast::*;
pub use error::{ErrorCode, ParseError, ParseResult};
pub use parser::parse;
pub use printer::print;
pub use span::{LineCol, LineIndex, Span};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_print() {
        let source = r#"<view><view v-if="ok"></view><view v-else></view></view>"#;
        let doc = parse(source).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(print(&doc), source);
    }

    #[test]
    fn test_mutate_then_print() {
        let mut doc = parse(r#"<view ref="flag"></view>"#).unwrap();
        let root = doc.roots()[0];
        let el = doc.element_mut(root).unwrap();
        el.attrs.rename("ref", "id");
        el.attrs.insert("class", "marker");
        assert_eq!(print(&doc), r#"<view id="flag" class="marker"></view>"#);
    }
}
