//! Static style declaration normalization.
//!
//! Lengths are authored in `cpx`, a unit on a 750px-wide design. Each target
//! family resolves it differently: web scales to `rem` or `px` according to the
//! [`StyleConfig`], weex to `px`, mini programs to their native `rpx`. Weex
//! additionally needs every color spelled as six-digit hex.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use crate::js::js_number;
use crate::style_config::StyleConfig;
use crate::target::Target;

/// Rewrites a static style declaration list for a target.
pub trait DeclarationNormalizer: Send + Sync {
    fn normalize(&self, declarations: &str, target: Target, config: Option<&StyleConfig>) -> String;
}

/// The built-in normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmssNormalizer;

static CPX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-?(?:\d+\.?\d*|\.\d+))cpx\b").expect("Invalid cpx regex pattern")
});

static NAMED_COLORS: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("black", "#000000"),
        ("silver", "#c0c0c0"),
        ("gray", "#808080"),
        ("grey", "#808080"),
        ("white", "#ffffff"),
        ("maroon", "#800000"),
        ("red", "#ff0000"),
        ("purple", "#800080"),
        ("fuchsia", "#ff00ff"),
        ("magenta", "#ff00ff"),
        ("green", "#008000"),
        ("lime", "#00ff00"),
        ("olive", "#808000"),
        ("yellow", "#ffff00"),
        ("navy", "#000080"),
        ("blue", "#0000ff"),
        ("teal", "#008080"),
        ("aqua", "#00ffff"),
        ("cyan", "#00ffff"),
        ("orange", "#ffa500"),
        ("pink", "#ffc0cb"),
        ("brown", "#a52a2a"),
        ("gold", "#ffd700"),
        ("indigo", "#4b0082"),
        ("violet", "#ee82ee"),
        ("darkgray", "#a9a9a9"),
        ("darkgrey", "#a9a9a9"),
        ("lightgray", "#d3d3d3"),
        ("lightgrey", "#d3d3d3"),
        ("darkred", "#8b0000"),
        ("darkblue", "#00008b"),
        ("darkgreen", "#006400"),
        ("lightblue", "#add8e6"),
        ("lightgreen", "#90ee90"),
        ("skyblue", "#87ceeb"),
        ("tomato", "#ff6347"),
        ("coral", "#ff7f50"),
        ("salmon", "#fa8072"),
        ("khaki", "#f0e68c"),
        ("beige", "#f5f5dc"),
        ("ivory", "#fffff0"),
        ("crimson", "#dc143c"),
        ("chocolate", "#d2691e"),
        ("tan", "#d2b48c"),
        ("turquoise", "#40e0d0"),
        ("whitesmoke", "#f5f5f5"),
    ]
    .into_iter()
    .collect()
});

impl DeclarationNormalizer for CmssNormalizer {
    fn normalize(&self, declarations: &str, target: Target, config: Option<&StyleConfig>) -> String {
        let descriptor = target.descriptor();
        if descriptor.is_weex {
            normalize_weex(declarations)
        } else if descriptor.is_miniapp {
            CPX.replace_all(declarations, "${1}rpx").into_owned()
        } else {
            scale_web(declarations, config)
        }
    }
}

fn scale_web(declarations: &str, config: Option<&StyleConfig>) -> String {
    let default = StyleConfig::default();
    let config = config.unwrap_or(&default);

    CPX.replace_all(declarations, |caps: &Captures| {
        let Ok(n) = caps[1].parse::<f64>() else {
            return caps[0].to_string();
        };
        if !config.rem_enabled() {
            format!("{}px", js_number(n * config.scale()))
        } else if n.abs() <= config.min_pixel_value() {
            format!("{}px", js_number(n))
        } else {
            format!("{}rem", js_number(n / config.root_value()))
        }
    })
    .into_owned()
}

fn normalize_weex(declarations: &str) -> String {
    split_declarations(declarations)
        .into_iter()
        .map(|decl| match decl.split_once(':') {
            Some((prop, value)) if !prop.contains("{{") => {
                format!("{}: {}", prop.trim(), normalize_weex_value(value.trim()))
            }
            _ => decl.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn normalize_weex_value(value: &str) -> String {
    let value = CPX.replace_all(value, "${1}px");
    if value.contains("{{") {
        return value.into_owned();
    }
    value
        .split_whitespace()
        .map(normalize_color)
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_color(token: &str) -> Cow<'_, str> {
    if let Some(hex) = token.strip_prefix('#') {
        if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let expanded: String = hex
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_lowercase();
            return Cow::Owned(format!("#{}", expanded));
        }
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Cow::Owned(token.to_ascii_lowercase());
        }
        return Cow::Borrowed(token);
    }
    match NAMED_COLORS.get(token.to_ascii_lowercase().as_str()) {
        Some(hex) => Cow::Borrowed(hex),
        None => Cow::Borrowed(token),
    }
}

/// Split on `;` outside parentheses, braces, brackets and quotes.
fn split_declarations(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' | '{' | '[' => depth += 1,
                ')' | '}' | ']' => depth = depth.saturating_sub(1),
                ';' if depth == 0 => {
                    parts.push(&text[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}
