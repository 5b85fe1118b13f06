//! Tooltip, layer and modal
//!
//! Thin wiring over [`Overlay`]: each constructor builds an overlay of the
//! matching kind and binds its trigger through the system's event router.
//! Handlers hold weak handles, so dropping the returned value disables them.

use perch_core::{EventKind, UiEvent};
use perch_dom::{NodeId, HIDDEN_CLASS};
use perch_overlay::{Overlay, OverlayConfig, OverlayKind, OverlaySystem};

/// Class of the page-covering node behind a modal
pub const DIMMER_CLASS: &str = "perch-dimmer";

fn on_trigger<F>(
    system: &OverlaySystem,
    node: NodeId,
    kind: EventKind,
    overlay: &Overlay,
    action: F,
) where
    F: Fn(&Overlay, &mut UiEvent) + 'static,
{
    let weak = overlay.downgrade();
    system.router().on(node, kind, move |event| {
        if let Some(overlay) = weak.upgrade() {
            action(&overlay, event);
        }
    });
}

/// Hint shown while the pointer is over `trigger`
pub fn tooltip(system: &OverlaySystem, trigger: NodeId, config: OverlayConfig) -> Overlay {
    let overlay = system.overlay(OverlayKind::Tooltip, config.trigger(trigger));
    on_trigger(system, trigger, EventKind::PointerEnter, &overlay, |o, e| {
        let _ = o.show_with(Some(e));
    });
    on_trigger(system, trigger, EventKind::PointerLeave, &overlay, |o, e| {
        let _ = o.hide_with(Some(e));
    });
    tracing::debug!("tooltip bound to {:?}", trigger);
    overlay
}

/// Panel toggled by clicking `trigger`
pub fn layer(system: &OverlaySystem, trigger: NodeId, config: OverlayConfig) -> Overlay {
    let overlay = system.overlay(OverlayKind::Layer, config.trigger(trigger));
    on_trigger(system, trigger, EventKind::Click, &overlay, |o, e| {
        let _ = if o.is_active() {
            o.hide_with(Some(e))
        } else {
            o.show_with(Some(e))
        };
    });
    tracing::debug!("layer bound to {:?}", trigger);
    overlay
}

/// Dialog over a dimmed page
#[derive(Clone, Debug)]
pub struct Modal {
    overlay: Overlay,
    dimmer: NodeId,
}

impl Modal {
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Covering node, attached while the modal is shown
    pub fn dimmer(&self) -> NodeId {
        self.dimmer
    }

    pub fn is_active(&self) -> bool {
        self.overlay.is_active()
    }
}

/// Closeable dialog opened by clicking `trigger`
///
/// The dimmer is attached just below the dialog once it is shown and
/// removed when it hides; clicking it closes the dialog.
pub fn modal(system: &OverlaySystem, trigger: NodeId, config: OverlayConfig) -> Modal {
    let overlay = system.overlay(
        OverlayKind::Modal,
        config.trigger(trigger).close_button(true),
    );
    on_trigger(system, trigger, EventKind::Click, &overlay, |o, e| {
        let _ = o.show_with(Some(e));
    });

    let dimmer = {
        let mut doc = system.document().borrow_mut();
        let dimmer = doc.create_element("div");
        // Fresh node; these cannot fail.
        let _ = doc.add_class(dimmer, DIMMER_CLASS);
        let _ = doc.add_class(dimmer, HIDDEN_CLASS);
        dimmer
    };
    on_trigger(system, dimmer, EventKind::Click, &overlay, |o, e| {
        let _ = o.hide_with(Some(e));
    });

    let document = system.document().clone();
    let weak = overlay.downgrade();
    overlay.on("show", move |_| {
        let Some(overlay) = weak.upgrade() else {
            return;
        };
        let mut doc = document.borrow_mut();
        let body = doc.body();
        let attached = doc
            .append_child(body, dimmer)
            .and_then(|_| doc.set_style(dimmer, "z-index", (overlay.z_index() - 1).to_string()))
            .and_then(|_| doc.remove_class(dimmer, HIDDEN_CLASS).map(drop));
        if let Err(err) = attached {
            tracing::warn!("cannot attach modal dimmer: {}", err);
        }
    });

    let document = system.document().clone();
    overlay.on("hide", move |_| {
        let mut doc = document.borrow_mut();
        let detached = doc
            .add_class(dimmer, HIDDEN_CLASS)
            .and_then(|_| doc.detach(dimmer));
        if let Err(err) = detached {
            tracing::warn!("cannot detach modal dimmer: {}", err);
        }
    });

    tracing::debug!("modal bound to {:?}", trigger);
    Modal { overlay, dimmer }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(system: &OverlaySystem) -> NodeId {
        let mut doc = system.document().borrow_mut();
        let node = doc.create_element("a");
        let body = doc.body();
        doc.append_child(body, node).unwrap();
        node
    }

    #[test]
    fn test_tooltip_follows_pointer() {
        let system = OverlaySystem::new();
        let trigger = button(&system);
        let tip = tooltip(&system, trigger, OverlayConfig::new().message("Hint").fx(false));

        system.pointer_enter(trigger);
        assert!(tip.is_active());
        system.pointer_leave(trigger);
        assert!(!tip.is_active());
    }

    #[test]
    fn test_layer_toggles_on_click() {
        let system = OverlaySystem::new();
        let trigger = button(&system);
        let panel = layer(&system, trigger, OverlayConfig::new().message("Panel").fx(false));

        let event = system.click(trigger);
        assert!(panel.is_active());
        assert!(event.is_default_prevented());

        system.click(trigger);
        assert!(!panel.is_active());
    }

    #[test]
    fn test_modal_dimmer_lifecycle() {
        let system = OverlaySystem::new();
        let trigger = button(&system);
        let dialog = modal(&system, trigger, OverlayConfig::new().message("Sure?").fx(false));
        assert!(dialog.overlay().is_closeable());
        assert!(!system.document().borrow().is_attached(dialog.dimmer()));

        system.click(trigger);
        {
            let doc = system.document().borrow();
            assert!(doc.is_attached(dialog.dimmer()));
            assert!(doc.is_visible(dialog.dimmer()));
            let dimmer_z: i32 = doc.style(dialog.dimmer(), "z-index").unwrap().parse().unwrap();
            assert!(dimmer_z < dialog.overlay().z_index());
        }

        system.click(dialog.dimmer());
        assert!(!dialog.is_active());
        assert!(!system.document().borrow().is_attached(dialog.dimmer()));
    }
}
