//! Single-slot delay buffer enforcing the one-step history admission rule.
//!
//! A window hash computed from the *current* window must not become
//! eligible to match that same window — otherwise every window would
//! trivially match itself. Holding the most recent window hash back by one
//! record before admitting it to [`crate::history::WindowHashHistory`] is
//! the entire mechanism behind that guarantee.

use crate::hash::WindowHash;

/// Holds at most one pending window hash, admitted on the following step.
#[derive(Debug, Default)]
pub struct DelayBuffer {
    pending: Option<WindowHash>,
}

impl DelayBuffer {
    /// An empty delay buffer.
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Removes and returns the currently held hash, if any.
    pub fn take(&mut self) -> Option<WindowHash> {
        self.pending.take()
    }

    /// Stores `hash`, overwriting whatever was previously held.
    ///
    /// Callers must [`take`](Self::take) the previous occupant (and admit
    /// it to history) before calling this, or that occupant is lost
    /// without ever reaching history.
    pub fn set(&mut self, hash: WindowHash) {
        self.pending = Some(hash);
    }
}
