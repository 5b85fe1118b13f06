//! Edit-in-place scenarios

use perch_core::Key;
use perch_dom::NodeId;
use perch_overlay::{OverlayConfig, OverlaySystem, TransitionOutcome};
use perch_widgets::{EditInPlace, TRIGGER_CLASS};

fn title(system: &OverlaySystem) -> NodeId {
    let mut doc = system.document().borrow_mut();
    let node = doc.create_element("h1");
    doc.set_html(node, "Quarterly report").unwrap();
    let body = doc.body();
    doc.append_child(body, node).unwrap();
    node
}

#[test]
fn test_click_opens_seeded_editor() {
    let system = OverlaySystem::new();
    let trigger = title(&system);
    let editor = EditInPlace::new(&system, trigger, OverlayConfig::new().fx(false));

    system.click(trigger);
    assert!(editor.is_active());

    let doc = system.document().borrow();
    assert!(doc.has_class(trigger, TRIGGER_CLASS));
    assert!(doc.has_class(editor.overlay().container(), "perch-edit-in-place"));
    let html = doc.html(editor.overlay().content_slot()).unwrap();
    assert!(html.contains("<textarea>Quarterly report</textarea>"));
    assert!(editor.overlay().close_button().is_some());
}

#[test]
fn test_escape_closes_editor() {
    let system = OverlaySystem::new();
    let trigger = title(&system);
    let editor = EditInPlace::new(&system, trigger, OverlayConfig::new());

    let shown = editor.show(None);
    system.advance(200);
    assert_eq!(pollster::block_on(shown), TransitionOutcome::Completed);

    system.key_down(Key::Escape);
    system.advance(200);
    assert!(!editor.is_active());
    assert!(!system
        .document()
        .borrow()
        .is_attached(editor.overlay().container()));
}
