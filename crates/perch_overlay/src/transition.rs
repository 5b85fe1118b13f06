//! Awaitable show/hide handles
//!
//! `show` and `hide` return a [`Transition`] that resolves once the
//! corresponding notification has fired. Calls that were guarded no-ops
//! resolve immediately with [`TransitionOutcome::Ignored`].
//!
//! ```rust
//! use perch_overlay::{OverlayConfig, OverlayKind, OverlaySystem, TransitionOutcome};
//!
//! let system = OverlaySystem::new();
//! let overlay = system.overlay(OverlayKind::Layer, OverlayConfig::new().message("Hi"));
//!
//! let mut shown = overlay.show();
//! assert_eq!(shown.try_outcome(), None);
//!
//! system.advance(200);
//! assert_eq!(pollster::block_on(shown), TransitionOutcome::Completed);
//! assert_eq!(pollster::block_on(overlay.show()), TransitionOutcome::Ignored);
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// How a show or hide request ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionOutcome {
    /// The transition ran and its notification fired
    Completed,
    /// The request was a no-op (already shown, not active, mid-animation)
    Ignored,
    /// The overlay went away before the transition finished
    Cancelled,
}

enum TransitionState {
    Ready(TransitionOutcome),
    Waiting(oneshot::Receiver<()>),
}

/// Future resolving when a show or hide finishes
#[must_use = "a Transition does nothing unless awaited or polled; drop it to ignore completion"]
pub struct Transition {
    state: TransitionState,
}

impl Transition {
    pub(crate) fn ready(outcome: TransitionOutcome) -> Self {
        Self {
            state: TransitionState::Ready(outcome),
        }
    }

    pub(crate) fn ignored() -> Self {
        Self::ready(TransitionOutcome::Ignored)
    }

    /// A transition still in flight, plus the handle that completes it
    pub(crate) fn pending() -> (Self, Completer) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                state: TransitionState::Waiting(rx),
            },
            Completer(tx),
        )
    }

    /// Outcome if already known, without blocking
    pub fn try_outcome(&mut self) -> Option<TransitionOutcome> {
        let outcome = match &mut self.state {
            TransitionState::Ready(outcome) => return Some(*outcome),
            TransitionState::Waiting(rx) => match rx.try_recv() {
                Ok(()) => TransitionOutcome::Completed,
                Err(oneshot::error::TryRecvError::Empty) => return None,
                Err(oneshot::error::TryRecvError::Closed) => TransitionOutcome::Cancelled,
            },
        };
        self.state = TransitionState::Ready(outcome);
        Some(outcome)
    }

    /// Finished, one way or another
    pub fn is_finished(&mut self) -> bool {
        self.try_outcome().is_some()
    }
}

impl Future for Transition {
    type Output = TransitionOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let outcome = match &mut self.state {
            TransitionState::Ready(outcome) => return Poll::Ready(*outcome),
            TransitionState::Waiting(rx) => match Pin::new(rx).poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(())) => TransitionOutcome::Completed,
                Poll::Ready(Err(_)) => TransitionOutcome::Cancelled,
            },
        };
        self.state = TransitionState::Ready(outcome);
        Poll::Ready(outcome)
    }
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            TransitionState::Ready(outcome) => f.debug_tuple("Transition").field(outcome).finish(),
            TransitionState::Waiting(_) => f.write_str("Transition(Waiting)"),
        }
    }
}

/// Completes one pending [`Transition`]
pub(crate) struct Completer(oneshot::Sender<()>);

impl Completer {
    pub(crate) fn complete(self) {
        // The caller may have dropped the Transition.
        let _ = self.0.send(());
    }
}
