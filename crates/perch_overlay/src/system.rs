//! Overlay system: the composition root
//!
//! [`OverlaySystem`] owns the services every overlay needs and injects them
//! at construction:
//!
//! - the shared document and its event router
//! - the z-index ordering service
//! - the event loop driving fades and fetch completions
//! - the Escape dispatcher (one document key handler for all overlays)
//! - the positioning service and content provider
//!
//! It also feeds synthetic input into the router, which is how hosts and
//! tests drive widgets.
//!
//! ```rust
//! use perch_core::Key;
//! use perch_overlay::{OverlayConfig, OverlayKind, OverlaySystem};
//!
//! let system = OverlaySystem::new();
//! let overlay = system.overlay(
//!     OverlayKind::Layer,
//!     OverlayConfig::new().message("Press Escape").close_button(true).fx(false),
//! );
//!
//! let _ = overlay.show();
//! system.key_down(Key::Escape);
//! assert!(!overlay.is_active());
//! ```

use std::rc::Rc;

use perch_core::{EventKind, EventLoop, Key, UiEvent, ZOrder};
use perch_dom::{shared_document, EventRouter, HandlerId, NodeId, SharedDocument};

use crate::config::{OverlayConfig, OverlayKind};
use crate::escape::{EscapeDispatcher, EscapePolicy};
use crate::overlay::Overlay;
use crate::positioner::{NoopPositioner, Positioner};
use crate::provider::{ContentProvider, UnavailableProvider};

/// Collaborators injected into every overlay
#[derive(Clone)]
pub struct OverlayServices {
    pub document: SharedDocument,
    pub router: Rc<EventRouter>,
    pub zorder: ZOrder,
    pub event_loop: EventLoop,
    pub positioner: Rc<dyn Positioner>,
    pub provider: Rc<dyn ContentProvider>,
    pub escape: Rc<EscapeDispatcher>,
}

/// Builder for [`OverlaySystem`]
pub struct OverlaySystemBuilder {
    document: Option<SharedDocument>,
    zorder: Option<ZOrder>,
    event_loop: Option<EventLoop>,
    positioner: Option<Rc<dyn Positioner>>,
    provider: Option<Rc<dyn ContentProvider>>,
    escape_policy: EscapePolicy,
}

impl OverlaySystemBuilder {
    pub fn new() -> Self {
        Self {
            document: None,
            zorder: None,
            event_loop: None,
            positioner: None,
            provider: None,
            escape_policy: EscapePolicy::default(),
        }
    }

    /// Use an existing document instead of a fresh one
    pub fn document(mut self, document: SharedDocument) -> Self {
        self.document = Some(document);
        self
    }

    pub fn zorder(mut self, zorder: ZOrder) -> Self {
        self.zorder = Some(zorder);
        self
    }

    pub fn event_loop(mut self, event_loop: EventLoop) -> Self {
        self.event_loop = Some(event_loop);
        self
    }

    pub fn positioner(mut self, positioner: Rc<dyn Positioner>) -> Self {
        self.positioner = Some(positioner);
        self
    }

    pub fn provider(mut self, provider: Rc<dyn ContentProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.escape_policy = policy;
        self
    }

    pub fn build(self) -> OverlaySystem {
        let services = OverlayServices {
            document: self.document.unwrap_or_else(shared_document),
            router: Rc::new(EventRouter::new()),
            zorder: self.zorder.unwrap_or_default(),
            event_loop: self.event_loop.unwrap_or_default(),
            positioner: self.positioner.unwrap_or_else(|| Rc::new(NoopPositioner)),
            provider: self.provider.unwrap_or_else(|| Rc::new(UnavailableProvider)),
            escape: Rc::new(EscapeDispatcher::new(self.escape_policy)),
        };

        let escape = Rc::clone(&services.escape);
        let escape_handler = services
            .router
            .on_document(EventKind::KeyDown, move |event| {
                if event.is_key(Key::Escape) {
                    escape.handle_escape(event);
                }
            });

        tracing::debug!("overlay system ready (escape: {:?})", self.escape_policy);
        OverlaySystem {
            services,
            escape_handler,
        }
    }
}

impl Default for OverlaySystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the overlay services and constructs overlays
pub struct OverlaySystem {
    services: OverlayServices,
    escape_handler: HandlerId,
}

impl OverlaySystem {
    /// System with a fresh document, no-op positioning and no provider
    pub fn new() -> Self {
        OverlaySystemBuilder::new().build()
    }

    pub fn builder() -> OverlaySystemBuilder {
        OverlaySystemBuilder::new()
    }

    /// Construct an overlay with this system's services
    pub fn overlay(&self, kind: OverlayKind, config: OverlayConfig) -> Overlay {
        Overlay::new(kind, config, self.services.clone())
    }

    pub fn services(&self) -> &OverlayServices {
        &self.services
    }

    pub fn document(&self) -> &SharedDocument {
        &self.services.document
    }

    pub fn router(&self) -> &EventRouter {
        &self.services.router
    }

    pub fn zorder(&self) -> &ZOrder {
        &self.services.zorder
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.services.event_loop
    }

    pub fn escape(&self) -> &EscapeDispatcher {
        &self.services.escape
    }

    /// The single document-scoped Escape handler
    pub fn escape_handler(&self) -> HandlerId {
        self.escape_handler
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Route `event` to `target` (or straight to document scope)
    pub fn dispatch(&self, target: Option<NodeId>, mut event: UiEvent) -> UiEvent {
        self.services
            .router
            .dispatch(&self.services.document, target, &mut event);
        event
    }

    pub fn click(&self, node: NodeId) -> UiEvent {
        self.dispatch(Some(node), UiEvent::click())
    }

    pub fn pointer_enter(&self, node: NodeId) -> UiEvent {
        self.dispatch(Some(node), UiEvent::new(EventKind::PointerEnter))
    }

    pub fn pointer_leave(&self, node: NodeId) -> UiEvent {
        self.dispatch(Some(node), UiEvent::new(EventKind::PointerLeave))
    }

    /// Key press with no focused element
    pub fn key_down(&self, key: Key) -> UiEvent {
        self.dispatch(None, UiEvent::key_down(key))
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Advance the event loop clock, running due fades and replies
    pub fn advance(&self, ms: u64) -> usize {
        self.services.event_loop.advance(ms)
    }

    pub fn run_until_idle(&self) -> usize {
        self.services.event_loop.run_until_idle()
    }
}

impl Default for OverlaySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OverlaySystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlaySystem")
            .field("event_loop", &self.services.event_loop)
            .field("escape", &self.services.escape)
            .field("next_z", &(self.services.zorder.peek() + 1))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_document_key_handler() {
        let system = OverlaySystem::new();
        let _overlays: Vec<Overlay> = (0..5)
            .map(|_| system.overlay(OverlayKind::Layer, OverlayConfig::new().close_button(true)))
            .collect();
        assert_eq!(system.router().document_handler_count(EventKind::KeyDown), 1);
        assert_eq!(system.escape().registered_count(), 5);
    }

    #[test]
    fn test_escape_without_active_overlay_is_untouched() {
        let system = OverlaySystem::new();
        let _overlay = system.overlay(OverlayKind::Layer, OverlayConfig::new().close_button(true));
        let event = system.key_down(Key::Escape);
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_injected_zorder() {
        let zorder = ZOrder::with_start(10);
        let system = OverlaySystem::builder().zorder(zorder.clone()).build();
        let overlay = system.overlay(OverlayKind::Tooltip, OverlayConfig::new());
        assert_eq!(overlay.z_index(), 11);
        assert_eq!(zorder.peek(), 11);
    }
}
