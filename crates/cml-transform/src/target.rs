//! Target platforms and their directive tables.
//!
//! Every transformer pass looks up the attribute names and value encodings it
//! emits in the [`TargetDescriptor`] for the current platform instead of
//! branching on the platform itself.

use std::fmt;
use std::str::FromStr;

use crate::error::TransformError;

/// Runtime helper wrapping dynamic style expressions.
pub const STYLE_PROXY: &str = "_cmlStyleProxy";
/// Runtime helper receiving two-way-binding input events.
pub const MODEL_PROXY: &str = "_cmlModelEventProxy";
/// Runtime helper resolving class bindings on weex.
pub const WEEX_CLASS_PROXY: &str = "_weexClassProxy";
/// Class token marking elements that carried a `ref`.
pub const REF_MARKER_CLASS: &str = "_cml_ref_lmc_";
/// Base class injected on every element.
pub const BASE_CLASS: &str = "cml-base";

/// An output dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Web,
    Weex,
    Wx,
    Alipay,
    Baidu,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Web,
        Target::Weex,
        Target::Wx,
        Target::Alipay,
        Target::Baidu,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Weex => "weex",
            Self::Wx => "wx",
            Self::Alipay => "alipay",
            Self::Baidu => "baidu",
        }
    }

    /// The directive table for this target.
    pub fn descriptor(self) -> &'static TargetDescriptor {
        match self {
            Self::Web => &WEB,
            Self::Weex => &WEEX,
            Self::Wx => &WX,
            Self::Alipay => &ALIPAY,
            Self::Baidu => &BAIDU,
        }
    }

    pub fn is_miniapp(self) -> bool {
        self.descriptor().is_miniapp
    }
}

impl FromStr for Target {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| TransformError::UnknownPlatform(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an expression is written into an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueEncoding {
    /// Copied verbatim.
    Raw,
    /// Wrapped in `{{ }}`.
    Braces,
}

impl ValueEncoding {
    pub fn encode(self, expr: &str) -> String {
        match self {
            Self::Raw => expr.to_string(),
            Self::Braces => format!("{{{{{}}}}}", expr),
        }
    }
}

/// Attribute names for `v-if` / `v-else-if` / `v-else`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalAttrs {
    pub if_attr: &'static str,
    pub else_if_attr: &'static str,
    pub else_attr: &'static str,
    pub encoding: ValueEncoding,
}

/// Output for `v-for`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationAttrs {
    /// The target understands `v-for` natively.
    Keep,
    /// Split into item, index and source attributes.
    Split {
        item_attr: &'static str,
        index_attr: &'static str,
        source_attr: &'static str,
        encoding: ValueEncoding,
    },
}

/// Output for `v-bind:prop` / `:prop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingAttrs {
    /// The target understands `v-bind` natively.
    Keep,
    /// Written as a plain `prop` attribute.
    Plain(ValueEncoding),
}

/// Output for `v-model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelAttrs {
    /// An input listener calling the model proxy plus a value binding.
    EventProxy {
        event_attr: &'static str,
        value_attr: &'static str,
    },
    /// A data-carried key, an input handler name and an interpolated value.
    DataKey {
        key_attr: &'static str,
        event_attr: &'static str,
        value_attr: &'static str,
    },
}

/// Where the `v-show` style text is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowSlot {
    /// A dynamic style binding, merged later by the style pass.
    Binding(&'static str),
    /// The static style attribute.
    Static(&'static str),
}

/// Output for `ref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefAttrs {
    /// The target has component refs; the attribute is dropped.
    Drop,
    /// Identity attribute plus a marker class.
    Identity {
        id_attr: &'static str,
        marker_class: &'static str,
    },
}

/// How static class, class binding and base classes combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMode {
    /// Static class keeps the base tokens; the binding is kept as written.
    Static,
    /// Like `Static`, with the binding wrapped in the weex class proxy.
    WeexProxy,
    /// Everything folded into one interpolated static class attribute.
    Fold,
}

/// How dynamic style bindings are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleMode {
    /// Wrapped in the style proxy with the style config as second argument.
    ProxyWithConfig,
    /// Wrapped in the style proxy alone.
    Proxy,
    /// Dropped; only the static style survives.
    Drop,
}

/// The directive table of one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub target: Target,
    pub is_miniapp: bool,
    pub is_weex: bool,
    pub reference: RefAttrs,
    pub conditional: ConditionalAttrs,
    pub iteration: IterationAttrs,
    pub binding: BindingAttrs,
    pub model: ModelAttrs,
    pub show: ShowSlot,
    pub class: ClassMode,
    pub style: StyleMode,
}

const VUE_CONDITIONAL: ConditionalAttrs = ConditionalAttrs {
    if_attr: "v-if",
    else_if_attr: "v-else-if",
    else_attr: "v-else",
    encoding: ValueEncoding::Raw,
};

const VUE_MODEL: ModelAttrs = ModelAttrs::EventProxy {
    event_attr: "v-on:input",
    value_attr: "v-bind:value",
};

const MINIAPP_REF: RefAttrs = RefAttrs::Identity {
    id_attr: "id",
    marker_class: REF_MARKER_CLASS,
};

pub const WEB: TargetDescriptor = TargetDescriptor {
    target: Target::Web,
    is_miniapp: false,
    is_weex: false,
    reference: RefAttrs::Drop,
    conditional: VUE_CONDITIONAL,
    iteration: IterationAttrs::Keep,
    binding: BindingAttrs::Keep,
    model: VUE_MODEL,
    show: ShowSlot::Binding(":style"),
    class: ClassMode::Static,
    style: StyleMode::ProxyWithConfig,
};

pub const WEEX: TargetDescriptor = TargetDescriptor {
    target: Target::Weex,
    is_weex: true,
    class: ClassMode::WeexProxy,
    style: StyleMode::Proxy,
    ..WEB
};

pub const WX: TargetDescriptor = TargetDescriptor {
    target: Target::Wx,
    is_miniapp: true,
    is_weex: false,
    reference: MINIAPP_REF,
    conditional: ConditionalAttrs {
        if_attr: "wx:if",
        else_if_attr: "wx:elif",
        else_attr: "wx:else",
        encoding: ValueEncoding::Braces,
    },
    iteration: IterationAttrs::Split {
        item_attr: "wx:for-item",
        index_attr: "wx:for-index",
        source_attr: "wx:for",
        encoding: ValueEncoding::Braces,
    },
    binding: BindingAttrs::Plain(ValueEncoding::Braces),
    model: ModelAttrs::DataKey {
        key_attr: "data-modelkey",
        event_attr: "bindinput",
        value_attr: "value",
    },
    show: ShowSlot::Static("style"),
    class: ClassMode::Fold,
    style: StyleMode::Drop,
};

pub const ALIPAY: TargetDescriptor = TargetDescriptor {
    target: Target::Alipay,
    conditional: ConditionalAttrs {
        if_attr: "a:if",
        else_if_attr: "a:elif",
        else_attr: "a:else",
        encoding: ValueEncoding::Braces,
    },
    iteration: IterationAttrs::Split {
        item_attr: "a:for-item",
        index_attr: "a:for-index",
        source_attr: "a:for",
        encoding: ValueEncoding::Braces,
    },
    // Alipay event attributes are camel-cased.
    model: ModelAttrs::DataKey {
        key_attr: "data-modelkey",
        event_attr: "bindInput",
        value_attr: "value",
    },
    ..WX
};

pub const BAIDU: TargetDescriptor = TargetDescriptor {
    target: Target::Baidu,
    conditional: ConditionalAttrs {
        if_attr: "s-if",
        else_if_attr: "s-elif",
        else_attr: "s-else",
        encoding: ValueEncoding::Raw,
    },
    iteration: IterationAttrs::Split {
        item_attr: "s-for-item",
        index_attr: "s-for-index",
        source_attr: "s-for",
        encoding: ValueEncoding::Raw,
    },
    ..WX
};
