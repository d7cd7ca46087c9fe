//! Known-sequence registry: every distinct sequence fingerprint discovered
//! so far, indexed by its start-window hash, bounded by recency-based
//! eviction.
//!
//! The two-level structure (start-hash bucket -> fingerprint -> entry)
//! exists because several distinct sequences can share a start-window
//! hash; eviction operates on whole buckets so that a single
//! least-recently-touched start hash is reclaimed at once, following the
//! `lru` crate's own recency model (as used for the page cache in the
//! teacher's pager layer).

use crate::hash::{SequenceFingerprint, WindowHash};
use lru::LruCache;
use std::collections::HashMap;

/// A previously finalized sequence of one or more windows, kept so future
/// occurrences can be recognized without re-deriving the candidate that
/// first discovered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownSequence {
    /// Hash of the sequence's first window; the registry's outer key.
    pub start_hash: WindowHash,
    /// Identity of the whole sequence (length + all window hashes).
    pub fingerprint: SequenceFingerprint,
    /// Number of records in the sequence; always `>= W`.
    pub length: usize,
    /// All `length - W + 1` window hashes, in order. Immutable after
    /// creation.
    pub window_hashes: Vec<WindowHash>,
    /// Number of times this sequence has been observed, including the
    /// occurrence that created it.
    pub repeat_count: u64,
    /// Preloaded entries (via known-sequence import) are never evicted,
    /// regardless of registry pressure.
    pub pinned: bool,
    /// Tracked-record index of the first record of the occurrence that
    /// created this entry. Absent for imported entries, whose defining
    /// occurrence happened in a different run.
    pub first_seen_start_index: Option<u64>,
}

impl KnownSequence {
    /// Builds a freshly discovered sequence with a repeat count of one.
    pub fn new(
        start_hash: WindowHash,
        fingerprint: SequenceFingerprint,
        length: usize,
        window_hashes: Vec<WindowHash>,
        first_seen_start_index: Option<u64>,
    ) -> Self {
        Self {
            start_hash,
            fingerprint,
            length,
            window_hashes,
            repeat_count: 1,
            pinned: false,
            first_seen_start_index,
        }
    }
}

type Bucket = HashMap<SequenceFingerprint, KnownSequence>;

/// Recency-ordered registry of [`KnownSequence`] entries, bounded to `U`
/// total entries across all start-hash buckets.
pub struct KnownSequenceRegistry {
    capacity: usize,
    buckets: LruCache<WindowHash, Bucket>,
    pinned_buckets: HashMap<WindowHash, Bucket>,
    total_entries: usize,
}

impl std::fmt::Debug for KnownSequenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnownSequenceRegistry")
            .field("capacity", &self.capacity)
            .field("total_entries", &self.total_entries)
            .finish()
    }
}

impl KnownSequenceRegistry {
    /// Creates an empty registry bounded to `capacity` total entries.
    pub fn new(capacity: usize) -> Self {
        // Capacity bounds the *total entry count* across all start-hash
        // buckets, not the bucket count, so the underlying LruCache is
        // left unbounded for recency tracking only — `enforce_capacity`
        // is what actually evicts, after each insert, based on
        // `total_entries`.
        Self {
            capacity,
            buckets: LruCache::unbounded(),
            pinned_buckets: HashMap::new(),
            total_entries: 0,
        }
    }

    /// All known sequences (pinned or not) whose start hash is `start_hash`.
    pub fn lookup_by_start(&self, start_hash: WindowHash) -> Vec<&KnownSequence> {
        let mut found: Vec<&KnownSequence> = Vec::new();
        if let Some(bucket) = self.pinned_buckets.get(&start_hash) {
            found.extend(bucket.values());
        }
        if let Some(bucket) = self.buckets.peek(&start_hash) {
            found.extend(bucket.values());
        }
        found
    }

    /// Refreshes recency for `start_hash` without modifying its contents.
    pub fn touch(&mut self, start_hash: WindowHash) {
        self.buckets.get(&start_hash);
    }

    /// Inserts a newly discovered sequence, or refreshes and returns the
    /// existing entry if its fingerprint is already present.
    pub fn insert(&mut self, sequence: KnownSequence) {
        if sequence.pinned {
            self.pinned_buckets
                .entry(sequence.start_hash)
                .or_default()
                .insert(sequence.fingerprint, sequence);
            return;
        }
        let start_hash = sequence.start_hash;
        if !self.buckets.contains(&start_hash) {
            self.buckets.put(start_hash, HashMap::new());
        }
        let bucket = self.buckets.get_mut(&start_hash).expect("just inserted");
        if bucket.insert(sequence.fingerprint, sequence).is_none() {
            self.total_entries += 1;
        }
        self.enforce_capacity();
    }

    /// Increments the repeat counter of an existing entry and refreshes
    /// its recency. Panics (as an invariant violation upstream) is never
    /// appropriate here — callers look up before calling this.
    pub fn bump_repeat(&mut self, start_hash: WindowHash, fingerprint: SequenceFingerprint) {
        if let Some(bucket) = self.pinned_buckets.get_mut(&start_hash) {
            if let Some(entry) = bucket.get_mut(&fingerprint) {
                entry.repeat_count += 1;
                return;
            }
        }
        if let Some(bucket) = self.buckets.get_mut(&start_hash) {
            if let Some(entry) = bucket.get_mut(&fingerprint) {
                entry.repeat_count += 1;
            }
        }
    }

    /// Looks up a single entry by fingerprint within its start-hash
    /// bucket, refreshing recency as a side effect (matches the access
    /// pattern of `lookup_by_start` immediately followed by a match).
    pub fn get(
        &mut self,
        start_hash: WindowHash,
        fingerprint: SequenceFingerprint,
    ) -> Option<&KnownSequence> {
        if let Some(bucket) = self.pinned_buckets.get(&start_hash) {
            if let Some(entry) = bucket.get(&fingerprint) {
                return Some(entry);
            }
        }
        self.buckets
            .get(&start_hash)
            .and_then(|bucket| bucket.get(&fingerprint))
    }

    fn enforce_capacity(&mut self) {
        while self.total_entries > self.capacity {
            let Some((_, evicted)) = self.buckets.pop_lru() else {
                break;
            };
            self.total_entries -= evicted.len();
        }
    }

    /// Total number of (non-pinned) entries currently tracked.
    pub fn len(&self) -> usize {
        self.total_entries
            + self.pinned_buckets.values().map(HashMap::len).sum::<usize>()
    }

    /// True when the registry holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every known sequence, pinned or discovered, for export.
    pub fn iter(&self) -> impl Iterator<Item = &KnownSequence> {
        self.pinned_buckets
            .values()
            .flat_map(HashMap::values)
            .chain(self.buckets.iter().flat_map(|(_, bucket)| bucket.values()))
    }
}
