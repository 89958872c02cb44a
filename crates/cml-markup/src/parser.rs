//! Parser for cml templates.

use smol_str::SmolStr;

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::span::Span;

/// Parse a template into a [`Document`].
pub fn parse(source: &str) -> ParseResult<Document> {
    let mut parser = TemplateParser::new(source);
    parser.parse_children(None)?;
    Ok(parser.doc)
}

struct TemplateParser<'a> {
    source: &'a str,
    pos: usize,
    doc: Document,
}

/// An open element waiting for its closing tag.
struct OpenTag {
    id: NodeId,
    tag: SmolStr,
}

impl<'a> TemplateParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            doc: Document::new(),
        }
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if pred(c) {
                self.advance();
            } else {
                break;
            }
        }
        &self.source[start..self.pos]
    }

    fn read_until(&mut self, s: &str) -> &'a str {
        let start = self.pos;
        while !self.is_eof() && !self.starts_with(s) {
            self.advance();
        }
        &self.source[start..self.pos]
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    /// Parse nodes until the closing tag of `open`, or EOF at the top level.
    fn parse_children(&mut self, open: Option<&OpenTag>) -> ParseResult<()> {
        let parent = open.map(|o| o.id);

        loop {
            if self.is_eof() {
                return match open {
                    Some(open) => Err(ParseError::unclosed_tag(
                        &open.tag,
                        self.doc.node(open.id).span,
                    )),
                    None => Ok(()),
                };
            }

            if self.starts_with("</") {
                let start = self.pos;
                self.consume("</");
                self.skip_whitespace();
                let name = self.read_while(is_tag_char);
                self.skip_whitespace();
                self.consume(">");
                let span = self.span_from(start);

                return match open {
                    Some(open) if open.tag.eq_ignore_ascii_case(name) => {
                        self.doc.node_mut(open.id).span.end = self.pos as u32;
                        Ok(())
                    }
                    Some(open) => Err(ParseError::mismatched_tag(&open.tag, name, span)),
                    None => Err(ParseError::unexpected_token(
                        "element or text",
                        &format!("</{}>", name),
                        span,
                    )),
                };
            }

            if self.starts_with("<!--") {
                self.parse_comment(parent);
            } else if self.starts_with("<") {
                self.parse_element(parent)?;
            } else {
                self.parse_text(parent);
            }
        }
    }

    fn parse_comment(&mut self, parent: Option<NodeId>) {
        let start = self.pos;
        self.consume("<!--");
        let content = self.read_until("-->");
        self.consume("-->");
        let span = self.span_from(start);
        self.doc
            .push(parent, NodeKind::Comment(content.to_string()), span);
    }

    /// Text runs up to the next tag; `<` inside `{{ }}` stays text.
    fn parse_text(&mut self, parent: Option<NodeId>) {
        let start = self.pos;
        while !self.is_eof() && !self.starts_with("<") {
            if self.consume("{{") {
                self.read_until("}}");
                self.consume("}}");
            } else {
                self.advance();
            }
        }
        let span = self.span_from(start);
        let content = self.source[start..self.pos].to_string();
        self.doc.push(parent, NodeKind::Text(content), span);
    }

    fn parse_element(&mut self, parent: Option<NodeId>) -> ParseResult<()> {
        let start = self.pos;
        self.consume("<");
        self.skip_whitespace();

        let tag = self.read_while(is_tag_char);
        if tag.is_empty() {
            let found = self.peek().map(String::from).unwrap_or_else(|| "EOF".into());
            return Err(ParseError::unexpected_token(
                "tag name",
                &found,
                self.span_from(start),
            ));
        }

        let attrs = self.parse_attributes()?;
        self.skip_whitespace();

        let closing = if self.consume("/>") {
            Closing::SelfClosing
        } else if self.consume(">") {
            if is_void_element(tag) {
                Closing::Void
            } else {
                Closing::Normal
            }
        } else {
            return Err(ParseError::unclosed_tag(tag, self.span_from(start)));
        };

        let element = Element {
            tag: tag.into(),
            attrs,
            closing,
        };
        let id = self
            .doc
            .push(parent, NodeKind::Element(element), self.span_from(start));

        if closing == Closing::Normal {
            let open = OpenTag { id, tag: tag.into() };
            self.parse_children(Some(&open))?;
        }
        Ok(())
    }

    fn parse_attributes(&mut self) -> ParseResult<Attributes> {
        let mut attrs = Attributes::new();

        loop {
            self.skip_whitespace();
            if self.is_eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }

            let name = self.read_while(|c| {
                c.is_ascii_alphanumeric()
                    || matches!(c, '-' | '_' | ':' | '.' | '@' | '#' | '[' | ']' | '$')
            });

            if name.is_empty() {
                // Stray character inside the start tag.
                self.advance();
                continue;
            }

            self.skip_whitespace();
            if self.consume("=") {
                self.skip_whitespace();
                let value = self.parse_attribute_value();
                attrs.insert(name, value);
            } else {
                attrs.insert_bare(name);
            }
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> String {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let value = self.read_while(|c| c != quote);
                self.advance();
                value.to_string()
            }
            _ => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || c == '>' || self.starts_with("/>") {
                        break;
                    }
                    self.advance();
                }
                self.source[start..self.pos].to_string()
            }
        }
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

/// Check if an element is a void element (no closing tag).
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
