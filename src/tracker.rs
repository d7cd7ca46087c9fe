//! The candidate tracker: the per-record state machine that advances every
//! in-flight hypothesis, finalizes the ones that have run their course, and
//! starts new ones from the current window hash. This is where the dedup
//! decision actually gets made; the engine's job around it is mostly
//! plumbing (history admission, buffer bookkeeping, emission).

use crate::candidate::{KnownSequenceMatch, NewSequenceCandidate};
use crate::hash::{self, WindowHash};
use crate::history::WindowHashHistory;
use crate::registry::{KnownSequence, KnownSequenceRegistry};

/// A contiguous range of tracked records confirmed as a duplicate of an
/// earlier occurrence, ready to be skipped (and optionally annotated) by
/// the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    /// Tracked-record index of the first record in the confirmed range.
    pub start_input_index: u64,
    /// Number of records covered by the confirmed range.
    pub len: usize,
    /// Tracked-record index of the first record of the matched earlier
    /// occurrence, if known.
    pub reference_start_index: Option<u64>,
    /// Number of records in the matched earlier occurrence, if known.
    pub reference_len: Option<usize>,
    /// Total number of times this sequence has now been observed
    /// (first occurrence plus repeats), for the `{count}` annotation field.
    pub occurrence_count: u64,
    /// True when this confirmation registered a brand-new [`KnownSequence`]
    /// rather than bumping an existing one.
    pub newly_discovered: bool,
}

impl Confirmation {
    fn end_input_index(&self) -> u64 {
        self.start_input_index + self.len as u64
    }

    fn overlaps_range(&self, start: u64, end: u64) -> bool {
        self.start_input_index < end && start < self.end_input_index()
    }
}

/// Owns every in-flight [`NewSequenceCandidate`] and [`KnownSequenceMatch`]
/// between one record and the next.
#[derive(Debug, Default)]
pub struct CandidateTracker {
    candidates: Vec<NewSequenceCandidate>,
    matches: Vec<KnownSequenceMatch>,
    next_creation_order: u64,
}

impl CandidateTracker {
    /// An empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no hypothesis is in flight.
    pub fn is_idle(&self) -> bool {
        self.candidates.is_empty() && self.matches.is_empty()
    }

    /// The tracked-record index one past the furthest-reaching active
    /// hypothesis: the number of trailing records the output buffer must
    /// keep, because some live hypothesis could still claim them.
    pub fn high_water_mark(&self) -> u64 {
        let candidate_max = self
            .candidates
            .iter()
            .map(NewSequenceCandidate::end_input_index)
            .max();
        let match_max = self
            .matches
            .iter()
            .map(KnownSequenceMatch::end_input_index)
            .max();
        candidate_max.into_iter().chain(match_max).max().unwrap_or(0)
    }

    /// Steps A-C of the per-record pipeline: advances every in-flight match
    /// and candidate against `window_hash`, finalizes whichever have run
    /// their course, and returns the resulting confirmations.
    ///
    /// A completing [`KnownSequenceMatch`] pre-empts any
    /// [`NewSequenceCandidate`] whose covered range overlaps it — an
    /// already-known sequence wins over a newly discovered one covering the
    /// same records. Among candidates finalizing on the same record, the
    /// one created first wins any remaining overlap.
    pub fn advance(
        &mut self,
        window_hash: WindowHash,
        history: &WindowHashHistory,
        registry: &mut KnownSequenceRegistry,
    ) -> Vec<Confirmation> {
        let mut confirmations = self.advance_matches(window_hash, registry);
        self.discard_overlapping_candidates(&confirmations);
        let mut candidate_confirmations = self.advance_and_finalize_candidates(window_hash, history, registry);
        candidate_confirmations.sort_by_key(|(order, _)| *order);
        for (_, confirmation) in candidate_confirmations {
            if confirmations
                .iter()
                .any(|c| c.overlaps_range(confirmation.start_input_index, confirmation.end_input_index()))
            {
                continue;
            }
            confirmations.push(confirmation);
        }
        confirmations
    }

    fn advance_matches(
        &mut self,
        window_hash: WindowHash,
        registry: &mut KnownSequenceRegistry,
    ) -> Vec<Confirmation> {
        let mut confirmations = Vec::new();
        let mut i = 0;
        while i < self.matches.len() {
            if self.matches[i].expected() != Some(window_hash) {
                self.matches.swap_remove(i);
                continue;
            }
            self.matches[i].next_index += 1;
            if self.matches[i].is_complete() {
                let finished = self.matches.swap_remove(i);
                registry.bump_repeat(finished.start_hash, finished.fingerprint);
                let occurrence_count = registry
                    .get(finished.start_hash, finished.fingerprint)
                    .map_or(1, |s| s.repeat_count);
                let length = finished.matched_len();
                confirmations.push(Confirmation {
                    start_input_index: finished.start_input_index,
                    len: length,
                    reference_start_index: finished.reference_start_index,
                    reference_len: finished.reference_start_index.map(|_| length),
                    occurrence_count,
                    newly_discovered: false,
                });
                continue;
            }
            i += 1;
        }
        confirmations
    }

    fn discard_overlapping_candidates(&mut self, confirmations: &[Confirmation]) {
        self.candidates.retain(|candidate| {
            !confirmations.iter().any(|c| {
                c.overlaps_range(candidate.start_input_index, candidate.end_input_index())
            })
        });
    }

    fn advance_and_finalize_candidates(
        &mut self,
        window_hash: WindowHash,
        history: &WindowHashHistory,
        registry: &mut KnownSequenceRegistry,
    ) -> Vec<(u64, Confirmation)> {
        let mut finalized = Vec::new();
        let mut still_active = Vec::with_capacity(self.candidates.len());
        for mut candidate in std::mem::take(&mut self.candidates) {
            let confirmed_windows = candidate.window_hashes.len() as u64;
            let mut survivors = candidate.viable_positions.clone();
            survivors.retain(|&p| history.get(p + confirmed_windows) == Some(window_hash));

            if survivors.is_empty() {
                let anchor = candidate.viable_positions.iter().copied().min();
                let order = candidate.creation_order;
                let confirmation = finalize_candidate(&candidate, anchor, registry);
                finalized.push((order, confirmation));
            } else {
                candidate.viable_positions = survivors;
                candidate.window_hashes.push(window_hash);
                candidate.matched_len += 1;
                still_active.push(candidate);
            }
        }
        self.candidates = still_active;
        finalized
    }

    /// Step D: starts new hypotheses from the current window hash —
    /// matches against any registered sequence sharing this start hash, and
    /// a candidate against every admissible (fully departed) history
    /// position sharing it.
    ///
    /// `window_start_index` is the tracked-record index of the first record
    /// of the window that just completed.
    ///
    /// A history position `p` is only admissible as a candidate anchor if
    /// its window has *fully departed* the one that just completed, i.e.
    /// `p + W <= window_start_index` — otherwise the two windows would
    /// share records and a duplicate claim would double-count them.
    ///
    /// A registered sequence whose entire length is one window (`L == W`)
    /// is already complete the moment it matches; such confirmations are
    /// returned directly rather than being kept as an active match waiting
    /// on a second window hash that will never come.
    pub fn start_new(
        &mut self,
        window_start_index: u64,
        window_size: usize,
        window_hash: WindowHash,
        history: &WindowHashHistory,
        registry: &mut KnownSequenceRegistry,
    ) -> Vec<Confirmation> {
        let mut confirmations = Vec::new();
        let already_matching: std::collections::HashSet<_> =
            self.matches.iter().map(|m| m.fingerprint).collect();
        let sequences: Vec<KnownSequence> = registry
            .lookup_by_start(window_hash)
            .into_iter()
            .filter(|s| !already_matching.contains(&s.fingerprint))
            .cloned()
            .collect();
        if !sequences.is_empty() {
            registry.touch(window_hash);
        }
        for sequence in sequences {
            let candidate_match =
                KnownSequenceMatch::start(&sequence, window_size, window_start_index);
            if candidate_match.is_complete() {
                registry.bump_repeat(candidate_match.start_hash, candidate_match.fingerprint);
                let occurrence_count = registry
                    .get(candidate_match.start_hash, candidate_match.fingerprint)
                    .map_or(1, |s| s.repeat_count);
                let length = candidate_match.matched_len();
                confirmations.push(Confirmation {
                    start_input_index: candidate_match.start_input_index,
                    len: length,
                    reference_start_index: candidate_match.reference_start_index,
                    reference_len: candidate_match.reference_start_index.map(|_| length),
                    occurrence_count,
                    newly_discovered: false,
                });
            } else {
                self.matches.push(candidate_match);
            }
        }

        let positions: smallvec::SmallVec<[_; 4]> = history
            .find_positions(window_hash)
            .iter()
            .copied()
            .filter(|&p| p + window_size as u64 <= window_start_index)
            .collect();
        if !positions.is_empty() {
            let order = self.next_creation_order;
            self.next_creation_order += 1;
            self.candidates.push(NewSequenceCandidate::start(
                window_start_index,
                window_size,
                window_hash,
                positions,
                order,
            ));
        }
        self.discard_overlapping_candidates(&confirmations);
        confirmations
    }

    /// EOS resolution: applies the detectability rule to every remaining
    /// candidate, in creation order, and discards any still-active known
    /// sequence matches (an incomplete match was never confirmed and has
    /// no further chance to complete).
    ///
    /// A candidate with viable position `p` is detectable iff, at total
    /// tracked-record count `total_tracked`, `total_tracked - (p + W) >= W`
    /// — i.e. at least `W` tracked records remained after the earliest
    /// point matching could have begun.
    pub fn finalize_at_eos(
        &mut self,
        total_tracked: u64,
        window_size: usize,
        registry: &mut KnownSequenceRegistry,
    ) -> Vec<Confirmation> {
        self.matches.clear();
        let mut candidates: Vec<NewSequenceCandidate> = std::mem::take(&mut self.candidates);
        candidates.sort_by_key(|c| c.creation_order);

        let mut confirmations = Vec::new();
        for candidate in candidates {
            let w = window_size as u64;
            let detectable_anchor = candidate
                .viable_positions
                .iter()
                .copied()
                .find(|&p| total_tracked.saturating_sub(p + w) >= w);
            let Some(anchor) = detectable_anchor else {
                continue;
            };
            if confirmations.iter().any(|c: &Confirmation| {
                c.overlaps_range(candidate.start_input_index, candidate.end_input_index())
            }) {
                continue;
            }
            confirmations.push(finalize_candidate(&candidate, Some(anchor), registry));
        }
        confirmations
    }
}

fn finalize_candidate(
    candidate: &NewSequenceCandidate,
    anchor: Option<crate::history::HistoryPosition>,
    registry: &mut KnownSequenceRegistry,
) -> Confirmation {
    let start_hash = candidate.window_hashes[0];
    let fingerprint = hash::hash_sequence(candidate.matched_len, &candidate.window_hashes);
    let newly_discovered = registry.get(start_hash, fingerprint).is_none();
    if newly_discovered {
        registry.insert(KnownSequence::new(
            start_hash,
            fingerprint,
            candidate.matched_len,
            candidate.window_hashes.clone(),
            Some(candidate.start_input_index),
        ));
    } else {
        registry.bump_repeat(start_hash, fingerprint);
    }
    let occurrence_count = registry.get(start_hash, fingerprint).map_or(1, |s| s.repeat_count);
    Confirmation {
        start_input_index: candidate.start_input_index,
        len: candidate.matched_len,
        reference_start_index: anchor,
        reference_len: anchor.map(|_| candidate.matched_len),
        occurrence_count,
        newly_discovered,
    }
}
