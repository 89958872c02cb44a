//! Element tree for cml templates.
//!
//! The tree is stored as an arena: every node lives in a single `Vec` owned by
//! the [`Document`] and refers to its parent and children by [`NodeId`]. Parent
//! links are for navigation only (finding preceding siblings), never ownership.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::span::Span;

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A parsed template.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

/// A node in the template tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Source span.
    pub span: Span,
}

/// The payload of a node.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// An element (native tag or component).
    Element(Element),
    /// Raw text, including any `{{ }}` interpolation.
    Text(String),
    /// A comment.
    Comment(String),
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent`, or as a root when `parent` is `None`.
    pub fn push(&mut self, parent: Option<NodeId>, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            span,
        });
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Get the element at `id`, if the node is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Get the element at `id` mutably, if the node is an element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The sibling list `id` belongs to (its parent's children, or the roots).
    pub fn siblings(&self, id: NodeId) -> &[NodeId] {
        match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }

    /// The closest preceding sibling that is an element, skipping text and
    /// comment nodes.
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.siblings(id);
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        siblings[..position]
            .iter()
            .rev()
            .copied()
            .find(|&sibling| self.element(sibling).is_some())
    }

    /// All node ids in document (pre-)order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }
}

/// How an element's start tag was closed in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Closing {
    /// `<tag>...</tag>`
    #[default]
    Normal,
    /// `<tag />`
    SelfClosing,
    /// HTML void element written without a slash, e.g. `<input>`.
    Void,
}

/// An element node (native tag or component).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    /// The tag name.
    pub tag: SmolStr,
    /// Attributes in source order.
    pub attrs: Attributes,
    pub closing: Closing,
}

impl Element {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attributes::default(),
            closing: Closing::Normal,
        }
    }
}

/// Ordered attribute map with unique names.
///
/// A `None` value is a bare attribute such as `v-else`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes(IndexMap<SmolStr, Option<String>>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Get an attribute value. Bare attributes read as the empty string.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|value| value.as_deref().unwrap_or(""))
    }

    /// Whether `name` is present without a value.
    pub fn is_bare(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(None))
    }

    /// Set an attribute, updating it in place if present or appending it.
    pub fn insert(&mut self, name: impl Into<SmolStr>, value: impl Into<String>) {
        self.insert_raw(name.into(), Some(value.into()));
    }

    /// Set a valueless attribute.
    pub fn insert_bare(&mut self, name: impl Into<SmolStr>) {
        self.insert_raw(name.into(), None);
    }

    fn insert_raw(&mut self, name: SmolStr, value: Option<String>) {
        match self.0.get_mut(&name) {
            Some(slot) => *slot = value,
            None => {
                self.0.insert(name, value);
            }
        }
    }

    /// Insert an attribute directly before `anchor`, or append it when
    /// `anchor` is absent. An existing attribute called `name` is moved.
    pub fn insert_before(&mut self, anchor: &str, name: impl Into<SmolStr>, value: impl Into<String>) {
        let name = name.into();
        self.0.shift_remove(&name);
        match self.0.get_index_of(anchor) {
            Some(index) => {
                self.0.shift_insert(index, name, Some(value.into()));
            }
            None => {
                self.0.insert(name, Some(value.into()));
            }
        }
    }

    /// Remove an attribute, preserving the order of the rest. Bare attributes
    /// come back as `Some(None)`.
    pub fn remove(&mut self, name: &str) -> Option<Option<String>> {
        self.0.shift_remove(name)
    }

    /// Rename an attribute in place, keeping its value and position.
    pub fn rename(&mut self, from: &str, to: impl Into<SmolStr>) -> bool {
        let Some(value) = self.0.get(from).cloned() else {
            return false;
        };
        self.replace_with(from, [(to.into(), value)])
    }

    /// Replace the attribute `name` with `attrs`, spliced in at its position.
    ///
    /// Any of the new names already present elsewhere are moved into the
    /// splice. Returns `false` (and changes nothing) when `name` is absent.
    pub fn replace_with<I, K>(&mut self, name: &str, attrs: I) -> bool
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<SmolStr>,
    {
        let Some(mut index) = self.0.get_index_of(name) else {
            return false;
        };
        self.0.shift_remove_index(index);
        for (key, value) in attrs {
            let key = key.into();
            if let Some(existing) = self.0.get_index_of(&key) {
                self.0.shift_remove_index(existing);
                if existing < index {
                    index -= 1;
                }
            }
            self.0.shift_insert(index, key, value);
            index += 1;
        }
        true
    }

    /// Iterate attributes in order; bare attributes yield `None`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(SmolStr::as_str)
    }
}

impl<K: Into<SmolStr>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}
