//! Base component capability
//!
//! Every widget embeds a [`Component`] and delegates to it for:
//!
//! - new-style notifications (`on` / `trigger`)
//! - legacy named callbacks (`set_callback` / `callbacks`), kept so older
//!   integrations that pass `onShow`-style hooks keep working
//! - suppressing the default action of the event that drove an operation
//!
//! Widgets are single-threaded, so registries use interior mutability and
//! every method takes `&self`. Handlers are cloned out of the registry before
//! they run, which lets a handler register or remove listeners on the same
//! component.
//!
//! # Example
//!
//! ```rust
//! use perch_core::Component;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let component = Component::new("layer");
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&log);
//! component.on("hide", move |name| sink.borrow_mut().push(name.to_string()));
//!
//! let sink = Rc::clone(&log);
//! component.set_callback("onHide", move || sink.borrow_mut().push("legacy".into()));
//!
//! component.trigger("hide");
//! component.callbacks("onHide");
//! assert_eq!(*log.borrow(), vec!["hide".to_string(), "legacy".to_string()]);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::events::UiEvent;

/// New-style listener, receives the notification name
pub type Listener = Rc<dyn Fn(&str)>;

/// Legacy callback registered under a name like `onShow`
pub type LegacyCallback = Rc<dyn Fn()>;

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a component instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Handle returned by [`Component::on`], used to remove the listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// The base capability composed into widgets
pub struct Component {
    id: ComponentId,
    kind: String,
    listeners: RefCell<IndexMap<String, Vec<(ListenerId, Listener)>>>,
    callbacks: RefCell<FxHashMap<String, LegacyCallback>>,
    next_listener: Cell<u64>,
}

impl Component {
    /// Create a component of the given kind (`"tooltip"`, `"modal"`, ...)
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: ComponentId::next(),
            kind: kind.into(),
            listeners: RefCell::new(IndexMap::new()),
            callbacks: RefCell::new(FxHashMap::default()),
            next_listener: Cell::new(1),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Register a listener for the notification `name`
    pub fn on<F>(&self, name: &str, listener: F) -> ListenerId
    where
        F: Fn(&str) + 'static,
    {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        for list in listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Emit the notification `name` to every listener, in registration order
    pub fn trigger(&self, name: &str) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .get(name)
            .map(|list| list.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default();

        tracing::trace!(
            "{}#{} trigger {:?} ({} listeners)",
            self.kind,
            self.id.0,
            name,
            listeners.len()
        );

        for listener in listeners {
            listener(name);
        }
    }

    /// Register (or replace) the legacy callback `name`
    pub fn set_callback<F>(&self, name: &str, callback: F)
    where
        F: Fn() + 'static,
    {
        self.set_callback_rc(name, Rc::new(callback));
    }

    /// Register an already shared legacy callback
    pub fn set_callback_rc(&self, name: &str, callback: LegacyCallback) {
        self.callbacks
            .borrow_mut()
            .insert(name.to_string(), callback);
    }

    /// Invoke the legacy callback `name`, if one is registered
    pub fn callbacks(&self, name: &str) {
        let callback = self.callbacks.borrow().get(name).cloned();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Suppress the default action of `event` and stop it bubbling
    pub fn prevent(&self, event: &mut UiEvent) {
        event.prevent_default();
        event.stop_propagation();
    }

    /// Number of listeners registered for `name`
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners
            .borrow()
            .get(name)
            .map(|list| list.len())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("listeners", &self.listeners.borrow().len())
            .field("callbacks", &self.callbacks.borrow().len())
            .finish()
    }
}
