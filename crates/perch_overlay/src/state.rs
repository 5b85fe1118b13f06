//! Overlay lifecycle state machine
//!
//! ```text
//!             SHOW                 ANIMATION_COMPLETE
//!  Inactive ───────▶ Showing ─────────────────────────▶ Active
//!     │                                                   │
//!     │ SHOW_IMMEDIATE (no effects)                       │
//!     └──────────────────────────────────────────────────▶│
//!                                                         │
//!             ANIMATION_COMPLETE            HIDE          │
//!  Inactive ◀───────────────────── Hiding ◀──────────────┤
//!     ▲                                                   │
//!     │ HIDE_IMMEDIATE (no effects)                       │
//!     └───────────────────────────────────────────────────┘
//! ```
//!
//! There is no interrupt edge: a hide requested while `Showing` has no
//! transition and is ignored, as is a show requested while `Hiding`.

use perch_core::StateTransitions;

/// Event codes for the overlay state machine
pub mod overlay_events {
    /// Start the enter animation (Inactive -> Showing)
    pub const SHOW: u32 = 30001;
    /// Show without animation (Inactive -> Active)
    pub const SHOW_IMMEDIATE: u32 = 30002;
    /// Start the exit animation (Active -> Hiding)
    pub const HIDE: u32 = 30003;
    /// Hide without animation (Active -> Inactive)
    pub const HIDE_IMMEDIATE: u32 = 30004;
    /// Animation completed (Showing -> Active, Hiding -> Inactive)
    pub const ANIMATION_COMPLETE: u32 = 30005;
}

/// Lifecycle of one overlay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum OverlayState {
    /// Detached from the document
    #[default]
    Inactive,
    /// Attached, enter animation playing
    Showing,
    /// Attached and fully shown
    Active,
    /// Attached, exit animation playing
    Hiding,
}

impl OverlayState {
    /// Fully shown
    pub fn is_active(&self) -> bool {
        matches!(self, OverlayState::Active)
    }

    /// Container is in the document
    pub fn is_attached(&self) -> bool {
        !matches!(self, OverlayState::Inactive)
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, OverlayState::Showing | OverlayState::Hiding)
    }
}

impl StateTransitions for OverlayState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use overlay_events::*;
        use OverlayState::*;

        match (self, event) {
            (Inactive, SHOW) => Some(Showing),
            (Inactive, SHOW_IMMEDIATE) => Some(Active),
            (Showing, ANIMATION_COMPLETE) => Some(Active),
            (Active, HIDE) => Some(Hiding),
            (Active, HIDE_IMMEDIATE) => Some(Inactive),
            (Hiding, ANIMATION_COMPLETE) => Some(Inactive),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::overlay_events::*;
    use super::*;

    #[test]
    fn test_animated_cycle() {
        let mut state = OverlayState::Inactive;

        state = state.on_event(SHOW).unwrap();
        assert_eq!(state, OverlayState::Showing);
        assert!(state.is_attached() && !state.is_active());

        state = state.on_event(ANIMATION_COMPLETE).unwrap();
        assert_eq!(state, OverlayState::Active);

        state = state.on_event(HIDE).unwrap();
        assert_eq!(state, OverlayState::Hiding);
        assert!(state.is_animating());

        state = state.on_event(ANIMATION_COMPLETE).unwrap();
        assert_eq!(state, OverlayState::Inactive);
    }

    #[test]
    fn test_immediate_cycle() {
        let state = OverlayState::Inactive.on_event(SHOW_IMMEDIATE).unwrap();
        assert_eq!(state, OverlayState::Active);
        assert_eq!(state.on_event(HIDE_IMMEDIATE), Some(OverlayState::Inactive));
    }

    #[test]
    fn test_guards() {
        assert_eq!(OverlayState::Active.on_event(SHOW), None);
        assert_eq!(OverlayState::Showing.on_event(SHOW), None);
        assert_eq!(OverlayState::Showing.on_event(HIDE), None);
        assert_eq!(OverlayState::Hiding.on_event(SHOW), None);
        assert_eq!(OverlayState::Inactive.on_event(HIDE), None);
        assert_eq!(OverlayState::Inactive.on_event(ANIMATION_COMPLETE), None);
    }
}
