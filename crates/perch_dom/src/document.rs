//! Document tree
//!
//! Nodes live in a slotmap arena owned by the [`Document`]. A node is
//! *attached* when walking its parents reaches `body`; detached nodes keep
//! their own subtree and can be re-inserted later, which is how widgets
//! reuse their containers across show/hide cycles.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::error::{DomError, Result};
use crate::node::{Node, NodeId};
use crate::selector::Selector;

/// Class that hides an element
pub const HIDDEN_CLASS: &str = "perch-hide";

/// Document shared by every widget on the page
pub type SharedDocument = Rc<RefCell<Document>>;

/// Create a new shared document
pub fn shared_document() -> SharedDocument {
    Rc::new(RefCell::new(Document::new()))
}

/// Arena-backed element tree
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node::new("body"));
        Self { nodes, body }
    }

    /// The root element
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of live nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(DomError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(DomError::NodeNotFound(id))
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Node::new(tag))
    }

    /// Append `child` as the last child of `parent`, moving it if needed
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_child(parent, child, None)
    }

    /// Insert `child` as the first child of `parent`, moving it if needed
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_child(parent, child, Some(0))
    }

    fn insert_child(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> Result<()> {
        self.get(parent)?;
        self.get(child)?;
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child)?;

        let children = &mut self.get_mut(parent)?.children;
        let len = children.len();
        match index {
            Some(i) => children.insert(i.min(len), child),
            None => children.push(child),
        }
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink `id` from its parent, keeping its subtree alive
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(());
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|c| *c != id);
        }
        self.get_mut(id)?.parent = None;
        Ok(())
    }

    /// Delete `id` and its whole subtree
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.body {
            return Err(DomError::HierarchyRequest {
                parent: self.body,
                child: id,
            });
        }
        self.detach(id)?;
        self.remove_subtree(id);
        Ok(())
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    /// Deep copy of `id`, returned detached
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId> {
        let source = self.get(id)?.clone();
        let copy = self.nodes.insert(Node {
            children: Vec::new(),
            parent: None,
            ..source.clone()
        });
        for child in source.children {
            let child_copy = self.clone_subtree(child)?;
            self.get_mut(copy)?.children.push(child_copy);
            self.get_mut(child_copy)?.parent = Some(copy);
        }
        Ok(copy)
    }

    /// Replace the contents of `id` with raw markup
    ///
    /// Existing child elements are deleted.
    pub fn set_html(&mut self, id: NodeId, markup: impl Into<String>) -> Result<()> {
        self.clear_children(id)?;
        self.get_mut(id)?.markup = markup.into();
        Ok(())
    }

    /// Replace the contents of `id` with the element `child`
    ///
    /// Existing child elements are deleted and `child` is moved in.
    pub fn replace_children(&mut self, id: NodeId, child: NodeId) -> Result<()> {
        self.get(child)?;
        // Keep `child` alive if it is currently one of the children.
        if self.get(id)?.children.contains(&child) {
            self.detach(child)?;
        }
        self.clear_children(id)?;
        self.get_mut(id)?.markup.clear();
        self.append_child(id, child)
    }

    fn clear_children(&mut self, id: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.get_mut(id)?.children);
        for child in children {
            self.remove_subtree(child);
        }
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Parents of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    /// Nearest ancestor of `id` (excluding `id`) with the given tag
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.ancestors(id)
            .into_iter()
            .find(|a| self.nodes.get(*a).map(|n| n.tag == tag).unwrap_or(false))
    }

    /// Is `id` part of the rendered page?
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.body || self.ancestors(id).last() == Some(&self.body)
    }

    /// Is `id` shown, i.e. neither it nor any ancestor carries the hidden class?
    pub fn is_visible(&self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        std::iter::once(id)
            .chain(self.ancestors(id))
            .all(|n| !self.has_class(n, HIDDEN_CLASS))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// First attached element matching `selector`, in document order
    pub fn query(&self, selector: &str) -> Result<Option<NodeId>> {
        self.query_within(self.body, selector)
    }

    /// Every attached element matching `selector`, in document order
    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.query_all_within(self.body, selector)
    }

    /// Every element matching `selector` inside `root` (root included)
    pub fn query_all_within(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        self.get(root)?;
        let mut out = Vec::new();
        self.walk(root, &mut |id, node| {
            if selector.matches(node) {
                out.push(id);
            }
            false
        });
        Ok(out)
    }

    /// First element matching `selector` inside `root` (root included)
    pub fn query_within(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        self.get(root)?;
        let mut found = None;
        self.walk(root, &mut |id, node| {
            if selector.matches(node) {
                found = Some(id);
                return true;
            }
            false
        });
        Ok(found)
    }

    /// Depth-first pre-order walk; the visitor returns true to stop
    fn walk<F>(&self, id: NodeId, visit: &mut F) -> bool
    where
        F: FnMut(NodeId, &Node) -> bool,
    {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if visit(id, node) {
            return true;
        }
        for child in &node.children {
            if self.walk(*child, visit) {
                return true;
            }
        }
        false
    }

    // =========================================================================
    // Markup
    // =========================================================================

    /// Inner markup: raw markup followed by serialized children
    pub fn html(&self, id: NodeId) -> Result<String> {
        let node = self.get(id)?;
        let mut out = node.markup.clone();
        for child in &node.children {
            out.push_str(&self.outer_html(*child)?);
        }
        Ok(out)
    }

    /// Element markup including its own tag
    pub fn outer_html(&self, id: NodeId) -> Result<String> {
        let node = self.get(id)?;
        Ok(format!("{}{}</{}>", node.open_tag(), self.html(id)?, node.tag))
    }

    // =========================================================================
    // Attributes, classes, style
    // =========================================================================

    pub fn add_class(&mut self, id: NodeId, classes: &str) -> Result<()> {
        let node = self.get_mut(id)?;
        for class in classes.split_whitespace() {
            node.add_class(class);
        }
        Ok(())
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<bool> {
        Ok(self.get_mut(id)?.remove_class(class))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes
            .get(id)
            .map(|n| n.has_class(class))
            .unwrap_or(false)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.attrs.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.attr(name))
    }

    pub fn set_style(
        &mut self,
        id: NodeId,
        property: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        self.get_mut(id)?
            .style
            .insert(property.to_string(), value.into());
        Ok(())
    }

    pub fn remove_style(&mut self, id: NodeId, property: &str) -> Result<()> {
        self.get_mut(id)?.style.shift_remove(property);
        Ok(())
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.style(property))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("body", &self.body)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(doc: &mut Document, tag: &str, id: &str) -> NodeId {
        let node = doc.create_element(tag);
        doc.set_attr(node, "id", id).unwrap();
        node
    }

    #[test]
    fn test_attach_and_detach() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        assert!(!doc.is_attached(div));

        doc.append_child(doc.body(), div).unwrap();
        assert!(doc.is_attached(div));
        assert_eq!(doc.children(doc.body()), &[div]);

        doc.detach(div).unwrap();
        assert!(!doc.is_attached(div));
        assert!(doc.contains(div));
        assert!(doc.children(doc.body()).is_empty());
    }

    #[test]
    fn test_prepend_and_move() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let other = doc.create_element("div");

        doc.append_child(body, a).unwrap();
        doc.prepend_child(body, b).unwrap();
        assert_eq!(doc.children(body), &[b, a]);

        doc.append_child(other, a).unwrap();
        assert_eq!(doc.children(body), &[b]);
        assert_eq!(doc.parent(a), Some(other));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();

        assert_eq!(
            doc.append_child(inner, outer),
            Err(DomError::HierarchyRequest {
                parent: inner,
                child: outer
            })
        );
        assert!(doc.append_child(outer, outer).is_err());
    }

    #[test]
    fn test_remove_deletes_subtree() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("p");
        doc.append_child(doc.body(), outer).unwrap();
        doc.append_child(outer, inner).unwrap();

        doc.remove(outer).unwrap();
        assert!(!doc.contains(outer));
        assert!(!doc.contains(inner));
        assert_eq!(doc.remove(outer), Err(DomError::NodeNotFound(outer)));
        assert!(doc.remove(doc.body()).is_err());
    }

    #[test]
    fn test_clone_subtree_is_deep_and_detached() {
        let mut doc = Document::new();
        let panel = element(&mut doc, "div", "panel");
        let text = doc.create_element("p");
        doc.set_html(text, "Hi").unwrap();
        doc.add_class(panel, "box perch-hide").unwrap();
        doc.append_child(panel, text).unwrap();
        doc.append_child(doc.body(), panel).unwrap();

        let copy = doc.clone_subtree(panel).unwrap();
        assert_ne!(copy, panel);
        assert!(!doc.is_attached(copy));
        assert_eq!(doc.outer_html(copy), doc.outer_html(panel));
        assert_ne!(doc.children(copy)[0], text);
    }

    #[test]
    fn test_set_html_replaces_children() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(div, child).unwrap();

        doc.set_html(div, "<b>x</b>").unwrap();
        assert!(!doc.contains(child));
        assert_eq!(doc.html(div).unwrap(), "<b>x</b>");
    }

    #[test]
    fn test_replace_children_keeps_new_child() {
        let mut doc = Document::new();
        let slot = doc.create_element("div");
        let old = doc.create_element("span");
        let fresh = doc.create_element("p");
        doc.append_child(slot, old).unwrap();
        doc.append_child(slot, fresh).unwrap();

        doc.replace_children(slot, fresh).unwrap();
        assert!(!doc.contains(old));
        assert_eq!(doc.children(slot), &[fresh]);
    }

    #[test]
    fn test_query_only_sees_attached_nodes() {
        let mut doc = Document::new();
        let panel = element(&mut doc, "div", "panel");
        assert_eq!(doc.query("#panel").unwrap(), None);

        doc.append_child(doc.body(), panel).unwrap();
        assert_eq!(doc.query("#panel").unwrap(), Some(panel));
        assert_eq!(doc.query("div#panel").unwrap(), Some(panel));
        assert!(doc.query("div p").is_err());
    }

    #[test]
    fn test_query_all_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element("a");
        let wrapper = doc.create_element("div");
        let b = doc.create_element("a");
        doc.append_child(body, a).unwrap();
        doc.append_child(body, wrapper).unwrap();
        doc.append_child(wrapper, b).unwrap();

        assert_eq!(doc.query_all("a").unwrap(), vec![a, b]);
        assert_eq!(doc.query_within(wrapper, "a").unwrap(), Some(b));
        assert_eq!(doc.query_all_within(wrapper, "a").unwrap(), vec![b]);

        let detached = doc.create_element("ul");
        let item = doc.create_element("a");
        doc.append_child(detached, item).unwrap();
        assert_eq!(doc.query_all("a").unwrap().len(), 2);
        assert_eq!(doc.query_all_within(detached, "a").unwrap(), vec![item]);
    }

    #[test]
    fn test_closest_and_visibility() {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        let field = doc.create_element("div");
        let button = doc.create_element("button");
        doc.append_child(doc.body(), form).unwrap();
        doc.append_child(form, field).unwrap();
        doc.append_child(field, button).unwrap();

        assert_eq!(doc.closest(button, "FORM"), Some(form));
        assert_eq!(doc.closest(form, "form"), None);

        assert!(doc.is_visible(button));
        doc.add_class(field, HIDDEN_CLASS).unwrap();
        assert!(!doc.is_visible(button));
        assert!(doc.is_visible(form));
    }

    #[test]
    fn test_outer_html() {
        let mut doc = Document::new();
        let div = element(&mut doc, "div", "x");
        doc.add_class(div, "card").unwrap();
        doc.set_style(div, "width", "300px").unwrap();
        doc.set_html(div, "Hello").unwrap();

        assert_eq!(
            doc.outer_html(div).unwrap(),
            "<div id=\"x\" class=\"card\" style=\"width: 300px\">Hello</div>"
        );

        doc.remove_style(div, "width").unwrap();
        assert_eq!(doc.style(div, "width"), None);
    }
}
