//! Z-index ordering service
//!
//! Stacking order is handed out by a counter that only counts up. It is an
//! explicit value owned by whatever composes the widgets and cloned into
//! each of them, so independent systems (and tests) get independent counters.

use std::cell::Cell;
use std::rc::Rc;

/// Starting value for a fresh counter
pub const DEFAULT_Z_START: i32 = 1000;

/// Shared, monotonically increasing z-index counter
///
/// Clones share the same counter.
#[derive(Clone, Debug)]
pub struct ZOrder {
    last: Rc<Cell<i32>>,
}

impl ZOrder {
    pub fn new() -> Self {
        Self::with_start(DEFAULT_Z_START)
    }

    /// Counter whose first `next()` returns `start + 1`
    pub fn with_start(start: i32) -> Self {
        Self {
            last: Rc::new(Cell::new(start)),
        }
    }

    /// Allocate the next z-index, strictly greater than every earlier one
    pub fn next(&self) -> i32 {
        let value = self.last.get().saturating_add(1);
        self.last.set(value);
        value
    }

    /// Last value handed out (or the start value if none yet)
    pub fn peek(&self) -> i32 {
        self.last.get()
    }

    /// Rewind the counter for every clone
    pub fn reset(&self, start: i32) {
        self.last.set(start);
    }
}

impl Default for ZOrder {
    fn default() -> Self {
        Self::new()
    }
}
