//! Escape key and close button handling

use std::cell::Cell;
use std::rc::Rc;

use perch_core::{EventKind, Key};
use perch_overlay::{EscapePolicy, Overlay, OverlayConfig, OverlayKind, OverlaySystem};

fn closeable(system: &OverlaySystem, message: &str) -> Overlay {
    system.overlay(
        OverlayKind::Layer,
        OverlayConfig::new()
            .message(message)
            .close_button(true)
            .fx(false),
    )
}

fn hide_counter(overlay: &Overlay) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    overlay.on("hide", move |_| sink.set(sink.get() + 1));
    count
}

#[test]
fn test_escape_hides_only_the_shown_overlay() {
    let system = OverlaySystem::new();
    let first = closeable(&system, "first");
    let second = closeable(&system, "second");
    let first_hides = hide_counter(&first);
    let second_hides = hide_counter(&second);

    let _ = first.show();
    let event = system.key_down(Key::Escape);

    assert!(!first.is_active());
    assert!(!second.is_active());
    assert_eq!(first_hides.get(), 1);
    assert_eq!(second_hides.get(), 0);
    assert!(event.is_default_prevented());
    assert_eq!(system.router().document_handler_count(EventKind::KeyDown), 1);
}

#[test]
fn test_escape_topmost_goes_newest_first() {
    let system = OverlaySystem::new();
    let first = closeable(&system, "first");
    let second = closeable(&system, "second");

    let _ = first.show();
    let _ = second.show();
    assert_eq!(system.escape().active(), vec![first.id(), second.id()]);

    system.key_down(Key::Escape);
    assert!(first.is_active());
    assert!(!second.is_active());

    system.key_down(Key::Escape);
    assert!(!first.is_active());
    assert_eq!(system.escape().active_count(), 0);
}

#[test]
fn test_escape_all_policy() {
    let system = OverlaySystem::builder()
        .escape_policy(EscapePolicy::All)
        .build();
    let overlays: Vec<Overlay> = (0..3)
        .map(|i| closeable(&system, &format!("overlay {}", i)))
        .collect();
    for overlay in &overlays[..2] {
        let _ = overlay.show();
    }
    let idle_hides = hide_counter(&overlays[2]);

    system.key_down(Key::Escape);

    assert!(overlays.iter().all(|o| !o.is_active()));
    assert_eq!(idle_hides.get(), 0);
}

#[test]
fn test_other_keys_are_ignored() {
    let system = OverlaySystem::new();
    let overlay = closeable(&system, "stay");
    let _ = overlay.show();

    system.key_down(Key::Enter);
    system.key_down(Key::Char('q'));
    assert!(overlay.is_active());
}

#[test]
fn test_non_closeable_overlay_ignores_escape() {
    let system = OverlaySystem::new();
    let overlay = system.overlay(OverlayKind::Tooltip, OverlayConfig::new().fx(false));
    let _ = overlay.show();

    system.key_down(Key::Escape);
    assert!(overlay.is_active());
    assert_eq!(system.escape().registered_count(), 0);
}

#[test]
fn test_escape_during_fade_in_does_nothing() {
    let system = OverlaySystem::new();
    let overlay = system.overlay(
        OverlayKind::Modal,
        OverlayConfig::new().close_button(true),
    );

    let _ = overlay.show();
    system.key_down(Key::Escape);
    system.advance(200);
    assert!(overlay.is_active());

    system.key_down(Key::Escape);
    assert!(!overlay.is_active());
    system.advance(200);
    assert!(!system.document().borrow().is_attached(overlay.container()));
}

#[test]
fn test_close_button_click_hides() {
    let system = OverlaySystem::new();
    let overlay = closeable(&system, "closeable");
    let _ = overlay.show();

    let event = system.click(overlay.close_button().unwrap());
    assert!(!overlay.is_active());
    assert!(event.is_default_prevented());
}

#[test]
fn test_dropped_overlay_is_forgotten() {
    let system = OverlaySystem::new();
    let overlay = closeable(&system, "gone");
    let _ = overlay.show();
    drop(overlay);

    let event = system.key_down(Key::Escape);
    assert!(!event.is_default_prevented());
    assert_eq!(system.escape().registered_count(), 0);
}
