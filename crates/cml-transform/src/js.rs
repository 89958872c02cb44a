//! Helpers for writing JavaScript literals into attribute values.

/// Quote `s` as a single-quoted JavaScript string literal.
pub fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Format a number the way a JavaScript object literal would print it.
pub fn js_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Builder for `{'key':value,...}` literals with keys in insertion order.
#[derive(Debug, Default)]
pub struct JsObject {
    fields: Vec<(&'static str, String)>,
}

impl JsObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.fields.push((key, value.into()));
        self
    }

    pub fn finish(&self) -> String {
        let body: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!("{}:{}", js_string(key), value))
            .collect();
        format!("{{{}}}", body.join(","))
    }
}

/// Render a string list as `['a','b']`.
pub fn js_array<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let items: Vec<String> = items.into_iter().map(js_string).collect();
    format!("[{}]", items.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("searchText"), "'searchText'");
        assert_eq!(js_string("it's"), r"'it\'s'");
        assert_eq!(js_string(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn test_js_number() {
        assert_eq!(js_number(75.0), "75");
        assert_eq!(js_number(0.5), "0.5");
        assert_eq!(js_number(1.01), "1.01");
        assert_eq!(js_number(100.0 / 75.0), "1.333333");
        assert_eq!(js_number(-0.0), "0");
    }

    #[test]
    fn test_js_object() {
        let mut obj = JsObject::new();
        obj.field("rem", "true").field("list", js_array(["> 1%"]));
        assert_eq!(obj.finish(), "{'rem':true,'list':['> 1%']}");
        assert_eq!(JsObject::new().finish(), "{}");
    }
}
