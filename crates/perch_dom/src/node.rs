//! Document nodes

use indexmap::IndexMap;
use slotmap::{new_key_type, Key};
use smallvec::SmallVec;

new_key_type! {
    pub struct NodeId;
}

impl NodeId {
    /// Convert to a raw u64 representation
    ///
    /// Used to carry node identity inside events.
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create from a raw u64 representation
    ///
    /// The raw value must have been created by `to_raw()`.
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// A single element
///
/// An element holds raw inner markup and/or child elements. Raw markup is
/// rendered before children.
#[derive(Clone, Debug, Default)]
pub struct Node {
    pub(crate) tag: String,
    pub(crate) classes: SmallVec<[String; 4]>,
    pub(crate) attrs: IndexMap<String, String>,
    pub(crate) style: IndexMap<String, String>,
    pub(crate) markup: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The `id` attribute
    pub fn element_id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    /// Raw inner markup (excluding children)
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub(crate) fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() != before
    }

    /// Opening tag with attributes, classes and inline style
    pub(crate) fn open_tag(&self) -> String {
        let mut out = format!("<{}", self.tag);
        if let Some(id) = self.attrs.get("id") {
            out.push_str(&format!(" id=\"{}\"", id));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", self.classes.join(" ")));
        }
        for (name, value) in self.attrs.iter().filter(|(n, _)| n.as_str() != "id") {
            out.push_str(&format!(" {}=\"{}\"", name, value));
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self
                .style
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            out.push_str(&format!(" style=\"{}\"", style.join("; ")));
        }
        out.push('>');
        out
    }
}
