//! Perch widgets
//!
//! Ready-made widgets on top of [`perch_overlay`]:
//!
//! - [`tooltip`], [`layer`] and [`modal`]: floating overlays bound to a trigger
//! - [`TabNavigator`]: tab strip over in-page or remotely loaded panels
//! - [`EditInPlace`]: inline editor opened from its trigger
//!
//! # Example
//!
//! ```rust
//! use perch_overlay::{OverlayConfig, OverlaySystem};
//! use perch_widgets::layer;
//!
//! let system = OverlaySystem::new();
//! let trigger = {
//!     let mut doc = system.document().borrow_mut();
//!     let link = doc.create_element("a");
//!     let body = doc.body();
//!     doc.append_child(body, link).unwrap();
//!     link
//! };
//!
//! let panel = layer(&system, trigger, OverlayConfig::new().message("Details").fx(false));
//! system.click(trigger);
//! assert!(panel.is_active());
//! ```

pub mod edit_in_place;
pub mod floats;
pub mod tab_navigator;

pub use edit_in_place::EditInPlace;
pub use floats::{layer, modal, tooltip, Modal, DIMMER_CLASS};
pub use tab_navigator::{Tab, TabNavigator, OPEN_TAB_CLASS, TAB_CONTENT_CLASS};

/// Class added to elements that open a widget
pub const TRIGGER_CLASS: &str = "perch-trigger";
