//! Run statistics exposed through [`crate::engine::Engine::stats`].

use serde::Serialize;

/// Snapshot of the engine's counters at the point it was requested.
///
/// Mirrors the external-interface `stats()` contract exactly: every field
/// named there appears here, plus nothing else.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Stats {
    /// Total records pushed, tracked or bypassed.
    pub total_records: u64,
    /// Records classified as tracked.
    pub tracked_records: u64,
    /// Records classified as bypassed.
    pub bypassed_records: u64,
    /// Tracked records actually written to the sink.
    pub emitted: u64,
    /// Tracked records claimed by a confirmed duplicate.
    pub skipped: u64,
    /// Distinct sequences currently held in the registry.
    pub known_sequences: u64,
    /// Distinct sequences discovered over the life of this instance
    /// (never decreases, unlike `known_sequences` which can shrink on
    /// eviction).
    pub sequences_discovered: u64,
}

impl Stats {
    /// Fraction of tracked records that were skipped as duplicates, in
    /// `[0.0, 1.0]`. `0.0` when no tracked records have arrived yet.
    pub fn redundancy_ratio(&self) -> f64 {
        if self.tracked_records == 0 {
            0.0
        } else {
            self.skipped as f64 / self.tracked_records as f64
        }
    }
}
