//! In-flight hypotheses tracked between one record and the next: a
//! [`NewSequenceCandidate`] bets that the stream is repeating some earlier
//! stretch of history, a [`KnownSequenceMatch`] bets that it's repeating a
//! specific already-registered sequence.
//!
//! Both types key their bookkeeping off the *tracked-record* input index
//! rather than an output-buffer offset, so that popping the output buffer
//! in the emitter never requires rewriting every live candidate's
//! position — see the bypass-independence note in `engine.rs`.

use crate::hash::{SequenceFingerprint, WindowHash};
use crate::history::HistoryPosition;
use smallvec::SmallVec;

/// Most candidates are anchored by a single history position; inline
/// storage for up to four avoids a heap allocation in the common case
/// while still handling windows that recur often within one history span.
pub type PositionSet = SmallVec<[HistoryPosition; 4]>;

/// A hypothesis, anchored at one or more surviving history positions, that
/// the stream starting at `start_input_index` is repeating an earlier run.
///
/// Created in step D of the per-record pipeline when the current window
/// hash matches a history position that has fully departed the active
/// window; finalized in step C once its viable-position set empties.
#[derive(Debug, Clone)]
pub struct NewSequenceCandidate {
    /// Tracked-record index (0-based) of this candidate's first covered
    /// record.
    pub start_input_index: u64,
    /// Records matched so far; always `>= W`.
    pub matched_len: usize,
    /// Every window hash accumulated since `start_input_index`, in order.
    /// Hashed into a [`SequenceFingerprint`] on finalization.
    pub window_hashes: Vec<WindowHash>,
    /// History positions this candidate could still be matching against.
    /// Finalized (removed from the tracker) once this set is empty.
    pub viable_positions: PositionSet,
    /// Monotonic creation sequence number, used to break ties when
    /// several candidates finalize on the same record (earliest-created
    /// wins, preferring the longest-running match).
    pub creation_order: u64,
}

impl NewSequenceCandidate {
    /// Starts a new candidate anchored at every position in `positions`,
    /// matched through the window that just completed
    /// (`matched_len = window_size`). Several anchors stay alive together
    /// on one candidate when the same window hash recurs more than once
    /// in history; they are pruned independently as later records arrive.
    pub fn start(
        start_input_index: u64,
        window_size: usize,
        window_hash: WindowHash,
        positions: impl IntoIterator<Item = HistoryPosition>,
        creation_order: u64,
    ) -> Self {
        Self {
            start_input_index,
            matched_len: window_size,
            window_hashes: vec![window_hash],
            viable_positions: positions.into_iter().collect(),
            creation_order,
        }
    }

    /// True once every anchoring position has been ruled out.
    pub fn is_finalized(&self) -> bool {
        self.viable_positions.is_empty()
    }

    /// Tracked-record index one past this candidate's last covered record.
    pub fn end_input_index(&self) -> u64 {
        self.start_input_index + self.matched_len as u64
    }
}

/// A hypothesis that the stream is repeating a specific
/// [`crate::registry::KnownSequence`], advancing one window-hash
/// comparison per record.
///
/// The sequence's window-hash list is snapshotted into the match at
/// creation (rather than referenced) so that registry eviction can never
/// invalidate a live match — see the design notes on aliasing.
#[derive(Debug, Clone)]
pub struct KnownSequenceMatch {
    /// Start-window hash of the sequence being matched; used to report
    /// back to the registry on confirmation.
    pub start_hash: WindowHash,
    /// Fingerprint of the sequence being matched.
    pub fingerprint: SequenceFingerprint,
    /// Snapshot of the sequence's window-hash list at match creation.
    pub window_hashes: Vec<WindowHash>,
    /// Configured window size, needed to translate `next_index` into a
    /// covered-record count.
    pub window_size: usize,
    /// Tracked-record index (0-based) of this match's first covered
    /// record.
    pub start_input_index: u64,
    /// Index into `window_hashes` of the next expected window hash.
    /// Starts at 1: creation itself confirms `window_hashes[0]`.
    pub next_index: usize,
    /// Tracked-record index of the first record of the sequence's
    /// defining occurrence, if known (absent for preloaded sequences
    /// whose defining occurrence happened in a different run).
    pub reference_start_index: Option<u64>,
}

impl KnownSequenceMatch {
    /// Starts a match against `sequence`, already having consumed its
    /// first window hash (hence `next_index = 1`).
    pub fn start(
        sequence: &crate::registry::KnownSequence,
        window_size: usize,
        start_input_index: u64,
    ) -> Self {
        Self {
            start_hash: sequence.start_hash,
            fingerprint: sequence.fingerprint,
            window_hashes: sequence.window_hashes.clone(),
            window_size,
            start_input_index,
            next_index: 1,
            reference_start_index: sequence.first_seen_start_index,
        }
    }

    /// The window hash this match next expects, or `None` if the sequence
    /// has already been fully matched.
    pub fn expected(&self) -> Option<WindowHash> {
        self.window_hashes.get(self.next_index).copied()
    }

    /// True once `next_index` has advanced past the end of the sequence —
    /// a confirmed duplicate.
    pub fn is_complete(&self) -> bool {
        self.next_index >= self.window_hashes.len()
    }

    /// Records matched so far: the first window (`window_size`) plus one
    /// per additional window hash confirmed.
    pub fn matched_len(&self) -> usize {
        self.window_size + self.next_index - 1
    }

    /// Tracked-record index one past this match's last covered record.
    pub fn end_input_index(&self) -> u64 {
        self.start_input_index + self.matched_len() as u64
    }
}
