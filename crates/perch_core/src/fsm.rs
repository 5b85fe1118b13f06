//! State machine trait
//!
//! Widget lifecycles are small enums that react to `u32` event codes.
//! Each widget module defines its own event constants next to its state type.

use std::hash::Hash;

/// Trait for enum-based state machines
///
/// # Example
///
/// ```rust
/// use perch_core::StateTransitions;
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// enum Toggle { Off, On }
///
/// const FLIP: u32 = 1;
///
/// impl StateTransitions for Toggle {
///     fn on_event(&self, event: u32) -> Option<Self> {
///         match (self, event) {
///             (Toggle::Off, FLIP) => Some(Toggle::On),
///             (Toggle::On, FLIP) => Some(Toggle::Off),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Toggle::Off.on_event(FLIP), Some(Toggle::On));
/// assert_eq!(Toggle::Off.on_event(99), None);
/// ```
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + std::fmt::Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}
