//! Event routing from input to element listeners
//!
//! ```text
//! Host input (click on node, key press)
//!     ↓
//! EventRouter::dispatch (target → ancestors → document scope)
//!     ↓
//! Widget handlers (show / hide / select ...)
//! ```
//!
//! The router is separate from the [`Document`](crate::Document) so that
//! handlers can borrow the document mutably while they run. The path is
//! computed up front with a short borrow and handlers are cloned out of the
//! registry before they are invoked.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use perch_core::{EventKind, UiEvent};
use rustc_hash::FxHashMap;

use crate::document::SharedDocument;
use crate::node::NodeId;

/// Event handler
pub type Handler = Rc<dyn Fn(&mut UiEvent)>;

/// Handle returned when registering a handler
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Routes input events to node-scoped and document-scoped handlers
pub struct EventRouter {
    node_handlers: RefCell<FxHashMap<(NodeId, EventKind), Vec<(HandlerId, Handler)>>>,
    document_handlers: RefCell<Vec<(EventKind, HandlerId, Handler)>>,
    next_id: Cell<u64>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self {
            node_handlers: RefCell::new(FxHashMap::default()),
            document_handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    fn next_id(&self) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        id
    }

    /// Listen for `kind` events on `node` (and bubbling from its descendants)
    pub fn on<F>(&self, node: NodeId, kind: EventKind, handler: F) -> HandlerId
    where
        F: Fn(&mut UiEvent) + 'static,
    {
        let id = self.next_id();
        self.node_handlers
            .borrow_mut()
            .entry((node, kind))
            .or_default()
            .push((id, Rc::new(handler)));
        id
    }

    /// Listen for `kind` events anywhere in the document
    pub fn on_document<F>(&self, kind: EventKind, handler: F) -> HandlerId
    where
        F: Fn(&mut UiEvent) + 'static,
    {
        let id = self.next_id();
        self.document_handlers
            .borrow_mut()
            .push((kind, id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn off(&self, id: HandlerId) -> bool {
        {
            let mut document = self.document_handlers.borrow_mut();
            if let Some(pos) = document.iter().position(|(_, hid, _)| *hid == id) {
                document.remove(pos);
                return true;
            }
        }
        let mut nodes = self.node_handlers.borrow_mut();
        for list in nodes.values_mut() {
            if let Some(pos) = list.iter().position(|(hid, _)| *hid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Drop every handler attached to `node`
    pub fn clear_node(&self, node: NodeId) {
        self.node_handlers
            .borrow_mut()
            .retain(|(n, _), _| *n != node);
    }

    /// Number of handlers registered for `kind` on `node`
    pub fn handler_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.node_handlers
            .borrow()
            .get(&(node, kind))
            .map(|l| l.len())
            .unwrap_or(0)
    }

    /// Number of document-scoped handlers for `kind`
    pub fn document_handler_count(&self, kind: EventKind) -> usize {
        self.document_handlers
            .borrow()
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .count()
    }

    /// Dispatch `event` to `target`, bubbling to its ancestors and then to
    /// document-scoped handlers until propagation is stopped
    ///
    /// With no target the event goes straight to document scope.
    /// Returns the number of handlers invoked.
    pub fn dispatch(
        &self,
        document: &SharedDocument,
        target: Option<NodeId>,
        event: &mut UiEvent,
    ) -> usize {
        let path: Vec<NodeId> = match target {
            Some(node) => {
                event.target = Some(node.to_raw());
                let doc = document.borrow();
                std::iter::once(node).chain(doc.ancestors(node)).collect()
            }
            None => Vec::new(),
        };

        let mut invoked = 0;
        for node in path {
            let handlers: Vec<Handler> = self
                .node_handlers
                .borrow()
                .get(&(node, event.kind))
                .map(|l| l.iter().map(|(_, h)| Rc::clone(h)).collect())
                .unwrap_or_default();
            for handler in handlers {
                handler(event);
                invoked += 1;
            }
            if event.is_propagation_stopped() {
                return invoked;
            }
        }

        let handlers: Vec<Handler> = self
            .document_handlers
            .borrow()
            .iter()
            .filter(|(k, _, _)| *k == event.kind)
            .map(|(_, _, h)| Rc::clone(h))
            .collect();
        for handler in handlers {
            handler(event);
            invoked += 1;
            if event.is_propagation_stopped() {
                break;
            }
        }

        tracing::trace!("dispatched {:?} to {} handler(s)", event.kind, invoked);
        invoked
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::shared_document;
    use perch_core::Key;

    #[test]
    fn test_bubbles_to_ancestors_then_document() {
        let document = shared_document();
        let (outer, inner) = {
            let mut doc = document.borrow_mut();
            let outer = doc.create_element("div");
            let inner = doc.create_element("a");
            let body = doc.body();
            doc.append_child(body, outer).unwrap();
            doc.append_child(outer, inner).unwrap();
            (outer, inner)
        };

        let log = Rc::new(RefCell::new(Vec::new()));
        let router = EventRouter::new();
        for (node, tag) in [(inner, "inner"), (outer, "outer")] {
            let log = Rc::clone(&log);
            router.on(node, EventKind::Click, move |_| log.borrow_mut().push(tag));
        }
        let sink = Rc::clone(&log);
        router.on_document(EventKind::Click, move |_| sink.borrow_mut().push("document"));

        let mut event = UiEvent::click();
        assert_eq!(router.dispatch(&document, Some(inner), &mut event), 3);
        assert_eq!(*log.borrow(), vec!["inner", "outer", "document"]);
        assert_eq!(event.target, Some(inner.to_raw()));
    }

    #[test]
    fn test_stop_propagation() {
        let document = shared_document();
        let node = {
            let mut doc = document.borrow_mut();
            let node = doc.create_element("button");
            let body = doc.body();
            doc.append_child(body, node).unwrap();
            node
        };

        let router = EventRouter::new();
        let reached = Rc::new(Cell::new(false));
        router.on(node, EventKind::Click, |event| event.stop_propagation());
        let flag = Rc::clone(&reached);
        router.on_document(EventKind::Click, move |_| flag.set(true));

        router.dispatch(&document, Some(node), &mut UiEvent::click());
        assert!(!reached.get());
    }

    #[test]
    fn test_handler_may_mutate_document() {
        let document = shared_document();
        let router = EventRouter::new();

        let doc_handle = Rc::clone(&document);
        router.on_document(EventKind::KeyDown, move |_| {
            let mut doc = doc_handle.borrow_mut();
            let node = doc.create_element("p");
            let body = doc.body();
            doc.append_child(body, node).unwrap();
        });

        router.dispatch(&document, None, &mut UiEvent::key_down(Key::Escape));
        assert_eq!(document.borrow().children(document.borrow().body()).len(), 1);
    }

    #[test]
    fn test_off_and_kind_filtering() {
        let document = shared_document();
        let router = EventRouter::new();
        let id = router.on_document(EventKind::KeyDown, |_| {});
        router.on_document(EventKind::Click, |_| {});
        assert_eq!(router.document_handler_count(EventKind::KeyDown), 1);

        assert!(router.off(id));
        assert!(!router.off(id));
        assert_eq!(
            router.dispatch(&document, None, &mut UiEvent::key_down(Key::Escape)),
            0
        );
    }
}
