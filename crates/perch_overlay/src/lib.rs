//! Perch floating overlays
//!
//! The shared machinery behind tooltips, layers, modals and the inline
//! editor. Each [`Overlay`] builds its shell once, resolves where its content
//! comes from, and runs a show/hide lifecycle:
//!
//! ```text
//! Inactive ──show──▶ Showing ──fade done──▶ Active ──hide──▶ Hiding ──fade done──▶ Inactive
//!     └─────────────── (fx off) ────────────▶ │ ◀──────────── (fx off) ──────────────┘
//! ```
//!
//! Content can be literal markup, a message, a remote fetch through a
//! [`ContentProvider`], or an element borrowed from the page and put back
//! when the overlay hides.
//!
//! # Example
//!
//! ```rust
//! use perch_overlay::{OverlayConfig, OverlayKind, OverlaySystem, TransitionOutcome};
//!
//! let system = OverlaySystem::new();
//! let overlay = system.overlay(
//!     OverlayKind::Modal,
//!     OverlayConfig::new().message("Are you sure?").close_button(true),
//! );
//!
//! let shown = overlay.show();
//! assert!(!overlay.is_active());
//!
//! system.advance(200);
//! assert!(overlay.is_active());
//! assert_eq!(pollster::block_on(shown), TransitionOutcome::Completed);
//! ```

pub mod config;
pub mod error;
pub mod escape;
pub mod layout;
pub mod overlay;
pub mod positioner;
pub mod provider;
pub mod source;
pub mod state;
pub mod system;
pub mod transition;

pub use config::{Dimension, Effects, Length, OverlayConfig, OverlayKind, PositionSpec};
pub use error::{OverlayError, Result};
pub use escape::{EscapeDispatcher, EscapePolicy};
pub use layout::{OverlayLayout, CLOSE_CLASSES, CONE_CLASS};
pub use overlay::{
    Overlay, RenderedContent, WeakOverlay, FX_HIDING_CLASS, FX_SHOWING_CLASS, LOADING_CLASS,
};
pub use positioner::{NoopPositioner, Positioner, RecordingPositioner};
pub use provider::{ContentProvider, Deliver, FetchReply, MemoryProvider, UnavailableProvider};
pub use source::{resolve_source, ContentSource, ResolvedSource, SourceOrigin};
pub use state::{overlay_events, OverlayState};
pub use system::{OverlayServices, OverlaySystem, OverlaySystemBuilder};
pub use transition::{Transition, TransitionOutcome};
