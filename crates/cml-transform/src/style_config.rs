//! Style processing configuration.

use serde::{Deserialize, Serialize};

use crate::js::{js_array, js_number, JsObject};

/// Default pixels per rem unit (750px design width).
pub const DEFAULT_ROOT_VALUE: f64 = 75.0;
/// Default threshold below which lengths are not scaled (leaves 1px alone).
pub const DEFAULT_MIN_PIXEL_VALUE: f64 = 1.01;

/// Options controlling unit scaling and prefixing of style declarations.
///
/// Every option is optional; absent options are omitted when the config is
/// rendered as a literal for the style proxy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    /// Scale `cpx` lengths into `rem` units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rem: Option<bool>,
    /// Multiplier applied to `cpx` lengths when not using rem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rem_options: Option<RemOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoprefix_options: Option<AutoprefixOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemOptions {
    /// Pixels per rem unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_value: Option<f64>,
    /// Lengths at or below this value are left unscaled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pixel_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoprefixOptions {
    /// Browser support queries, in order.
    #[serde(default)]
    pub browsers: Vec<String>,
}

impl StyleConfig {
    pub fn rem_enabled(&self) -> bool {
        self.rem.unwrap_or(false)
    }

    pub fn scale(&self) -> f64 {
        self.scale.unwrap_or(1.0)
    }

    pub fn root_value(&self) -> f64 {
        self.rem_options
            .as_ref()
            .and_then(|o| o.root_value)
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_ROOT_VALUE)
    }

    pub fn min_pixel_value(&self) -> f64 {
        self.rem_options
            .as_ref()
            .and_then(|o| o.min_pixel_value)
            .unwrap_or(DEFAULT_MIN_PIXEL_VALUE)
    }

    /// Render as a JavaScript object literal, keys in declaration order:
    /// `rem`, `scale`, `remOptions`, `autoprefixOptions`.
    pub fn to_js_literal(&self) -> String {
        let mut obj = JsObject::new();
        if let Some(rem) = self.rem {
            obj.field("rem", rem.to_string());
        }
        if let Some(scale) = self.scale {
            obj.field("scale", js_number(scale));
        }
        if let Some(options) = &self.rem_options {
            let mut inner = JsObject::new();
            if let Some(root_value) = options.root_value {
                inner.field("rootValue", js_number(root_value));
            }
            if let Some(min_pixel_value) = options.min_pixel_value {
                inner.field("minPixelValue", js_number(min_pixel_value));
            }
            obj.field("remOptions", inner.finish());
        }
        if let Some(options) = &self.autoprefix_options {
            let mut inner = JsObject::new();
            inner.field("browsers", js_array(options.browsers.iter().map(String::as_str)));
            obj.field("autoprefixOptions", inner.finish());
        }
        obj.finish()
    }
}
