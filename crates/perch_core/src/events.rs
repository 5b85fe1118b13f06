//! Input event model
//!
//! A `UiEvent` is what the document router hands to listeners. It carries
//! the default-prevented and propagation flags that the base component's
//! `prevent()` helper flips.

/// Kind of input event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Primary button click / tap
    Click,
    /// Pointer moved onto an element
    PointerEnter,
    /// Pointer moved off an element
    PointerLeave,
    /// Key pressed
    KeyDown,
    /// Form submission
    Submit,
}

/// Keys the widgets care about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Char(char),
}

/// An input event travelling through the document
#[derive(Clone, Debug, PartialEq)]
pub struct UiEvent {
    /// What happened
    pub kind: EventKind,
    /// Key for `KeyDown` events
    pub key: Option<Key>,
    /// Raw id of the node the event was dispatched to (if any)
    pub target: Option<u64>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl UiEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            key: None,
            target: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// A click event
    pub fn click() -> Self {
        Self::new(EventKind::Click)
    }

    /// A key-down event for `key`
    pub fn key_down(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown)
        }
    }

    /// Set the raw target node id
    pub fn with_target(mut self, raw: u64) -> Self {
        self.target = Some(raw);
        self
    }

    /// Suppress the default action for this event
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event from bubbling further
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Check if this is a key-down event for `key`
    pub fn is_key(&self, key: Key) -> bool {
        self.kind == EventKind::KeyDown && self.key == Some(key)
    }
}
