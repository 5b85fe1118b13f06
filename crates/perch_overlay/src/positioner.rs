//! Positioning service seam
//!
//! Placement itself is out of scope here; overlays only decide *when* the
//! service runs: after the visible state is applied, when remote content
//! lands (if a position spec was supplied), and on every size change.

use std::cell::RefCell;

use perch_dom::Document;

use crate::config::PositionSpec;

/// Places an overlay container relative to its anchor
pub trait Positioner {
    /// `spec.element` is the attached container
    fn position(&self, document: &mut Document, spec: &PositionSpec);
}

/// Positioner that leaves the container where it is
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPositioner;

impl Positioner for NoopPositioner {
    fn position(&self, _document: &mut Document, _spec: &PositionSpec) {}
}

/// Positioner that records every request; useful for hosts that place
/// overlays in a later layout pass
#[derive(Debug, Default)]
pub struct RecordingPositioner {
    requests: RefCell<Vec<PositionSpec>>,
}

impl RecordingPositioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every spec received so far
    pub fn requests(&self) -> Vec<PositionSpec> {
        self.requests.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Take the recorded requests, leaving the log empty
    pub fn drain(&self) -> Vec<PositionSpec> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }
}

impl Positioner for RecordingPositioner {
    fn position(&self, _document: &mut Document, spec: &PositionSpec) {
        self.requests.borrow_mut().push(spec.clone());
    }
}
