//! Edit in place
//!
//! Clicking the trigger opens a closeable editor seeded with the trigger's
//! markup as it was when the widget was built.

use perch_core::{EventKind, UiEvent};
use perch_dom::NodeId;
use perch_overlay::{Overlay, OverlayConfig, OverlayKind, OverlaySystem, Transition};

use crate::TRIGGER_CLASS;

/// Editor form around `text`
fn editor_markup(text: &str) -> String {
    format!(
        concat!(
            "<div><textarea>{}</textarea><p>",
            "<input type=\"submit\" value=\"Save\" class=\"btn secondary\"> ",
            "<a href=\"#\">Cancel</a></p></div>",
        ),
        text
    )
}

/// Inline editor bound to a trigger
#[derive(Clone, Debug)]
pub struct EditInPlace {
    overlay: Overlay,
    trigger: NodeId,
}

impl EditInPlace {
    pub fn new(system: &OverlaySystem, trigger: NodeId, config: OverlayConfig) -> Self {
        let text = {
            let mut doc = system.document().borrow_mut();
            if let Err(err) = doc.add_class(trigger, TRIGGER_CLASS) {
                tracing::warn!("edit-in-place trigger unavailable: {}", err);
            }
            doc.html(trigger).unwrap_or_default()
        };

        let overlay = system.overlay(
            OverlayKind::EditInPlace,
            config
                .trigger(trigger)
                .content(editor_markup(&text))
                .close_button(true),
        );

        let weak = overlay.downgrade();
        system.router().on(trigger, EventKind::Click, move |event| {
            if let Some(overlay) = weak.upgrade() {
                let _ = overlay.show_with(Some(event));
            }
        });

        Self { overlay, trigger }
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn is_active(&self) -> bool {
        self.overlay.is_active()
    }

    pub fn show(&self, event: Option<&mut UiEvent>) -> Transition {
        self.overlay.show_with(event)
    }

    pub fn hide(&self, event: Option<&mut UiEvent>) -> Transition {
        self.overlay.hide_with(event)
    }
}
