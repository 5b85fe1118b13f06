//! Shared Escape-key dispatcher
//!
//! One dispatcher serves every closeable overlay of an [`OverlaySystem`].
//! Overlays register once at construction; the dispatcher tracks which of
//! them are currently active, in the order they became active, and hides
//! them on Escape according to its [`EscapePolicy`].
//!
//! [`OverlaySystem`]: crate::OverlaySystem

use std::cell::{Cell, RefCell};

use indexmap::{IndexMap, IndexSet};
use perch_core::{ComponentId, UiEvent};
use serde::Deserialize;

use crate::overlay::{Overlay, WeakOverlay};
use crate::transition::TransitionOutcome;

/// Which active overlays Escape closes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscapePolicy {
    /// The most recently shown one
    #[default]
    Topmost,
    /// Every active one, newest first
    All,
}

/// Routes Escape presses to active closeable overlays
#[derive(Default)]
pub struct EscapeDispatcher {
    policy: Cell<EscapePolicy>,
    registered: RefCell<IndexMap<ComponentId, WeakOverlay>>,
    active: RefCell<IndexSet<ComponentId>>,
}

impl EscapeDispatcher {
    pub fn new(policy: EscapePolicy) -> Self {
        Self {
            policy: Cell::new(policy),
            ..Default::default()
        }
    }

    pub fn policy(&self) -> EscapePolicy {
        self.policy.get()
    }

    pub fn set_policy(&self, policy: EscapePolicy) {
        self.policy.set(policy);
    }

    /// Make `overlay` eligible for Escape handling
    pub fn register(&self, overlay: &Overlay) {
        self.registered
            .borrow_mut()
            .insert(overlay.id(), overlay.downgrade());
    }

    pub fn is_registered(&self, id: ComponentId) -> bool {
        self.registered.borrow().contains_key(&id)
    }

    /// `id` finished showing; it becomes the topmost
    pub(crate) fn notify_shown(&self, id: ComponentId) {
        if !self.is_registered(id) {
            return;
        }
        let mut active = self.active.borrow_mut();
        active.shift_remove(&id);
        active.insert(id);
    }

    /// `id` started hiding
    pub(crate) fn notify_hidden(&self, id: ComponentId) {
        self.active.borrow_mut().shift_remove(&id);
    }

    /// Number of registered overlays
    pub fn registered_count(&self) -> usize {
        self.registered.borrow().len()
    }

    /// Number of registered overlays currently active
    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    /// Active overlays, oldest first
    pub fn active(&self) -> Vec<ComponentId> {
        self.active.borrow().iter().copied().collect()
    }

    /// Hide active overlays per the policy
    ///
    /// Returns the number of overlays that started hiding. The event is only
    /// consumed when something was hidden.
    pub fn handle_escape(&self, event: &mut UiEvent) -> usize {
        self.prune();

        let targets: Vec<Overlay> = {
            let registered = self.registered.borrow();
            let active = self.active.borrow();
            let newest_first = active
                .iter()
                .rev()
                .filter_map(|id| registered.get(id))
                .filter_map(WeakOverlay::upgrade);
            match self.policy.get() {
                EscapePolicy::Topmost => newest_first.take(1).collect(),
                EscapePolicy::All => newest_first.collect(),
            }
        };

        let mut hidden = 0;
        for overlay in targets {
            let mut transition = overlay.hide_with(Some(&mut *event));
            if transition.try_outcome() != Some(TransitionOutcome::Ignored) {
                hidden += 1;
            }
        }

        if hidden > 0 {
            tracing::debug!("escape hid {} overlay(s)", hidden);
        }
        hidden
    }
}

impl EscapeDispatcher {
    /// Forget overlays that have been dropped
    fn prune(&self) {
        let mut registered = self.registered.borrow_mut();
        registered.retain(|_, weak| weak.upgrade().is_some());
        self.active
            .borrow_mut()
            .retain(|id| registered.contains_key(id));
    }
}

impl std::fmt::Debug for EscapeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscapeDispatcher")
            .field("policy", &self.policy.get())
            .field("registered", &self.registered.borrow().len())
            .field("active", &self.active.borrow().len())
            .finish()
    }
}
