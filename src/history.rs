//! Position-indexed, capacity-bounded window-hash history.
//!
//! Append-only in admission order, FIFO-evicted once capacity is reached,
//! with a reverse index for `find_positions`. This is the structure that
//! lets the candidate tracker ask "has this window hash been seen before,
//! and where" in amortized O(1).

use crate::hash::WindowHash;
use rustc_hash::FxHashMap;
use std::collections::{HashMap, VecDeque};

/// A stable, monotonically increasing handle into the history.
///
/// Never reused. A lookup for a position that has since been evicted
/// returns `None` rather than panicking or wrapping around to a newer
/// entry — callers (candidates) are expected to drop positions that come
/// back absent.
pub type HistoryPosition = u64;

/// Append-only map `position -> WindowHash` with a reverse index and
/// bounded capacity `H`.
///
/// `H = None` means unlimited: admissions never evict.
#[derive(Debug)]
pub struct WindowHashHistory {
    capacity: Option<usize>,
    next_position: HistoryPosition,
    oldest_position: HistoryPosition,
    forward: HashMap<HistoryPosition, WindowHash>,
    reverse: FxHashMap<WindowHash, Vec<HistoryPosition>>,
    order: VecDeque<HistoryPosition>,
}

impl WindowHashHistory {
    /// Creates an empty history bounded to `capacity` entries (`None` for
    /// unlimited).
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            next_position: 0,
            oldest_position: 0,
            forward: HashMap::new(),
            reverse: FxHashMap::default(),
            order: VecDeque::new(),
        }
    }

    /// Admits `hash` at a freshly assigned position, evicting the oldest
    /// entry first if the history is at capacity.
    ///
    /// Returns the position assigned to `hash`.
    pub fn append(&mut self, hash: WindowHash) -> HistoryPosition {
        if let Some(cap) = self.capacity {
            while self.order.len() >= cap {
                self.evict_oldest();
            }
        }
        let position = self.next_position;
        self.next_position += 1;
        self.forward.insert(position, hash);
        self.reverse.entry(hash).or_default().push(position);
        self.order.push_back(position);
        position
    }

    fn evict_oldest(&mut self) {
        let Some(position) = self.order.pop_front() else {
            return;
        };
        if let Some(hash) = self.forward.remove(&position) {
            if let Some(positions) = self.reverse.get_mut(&hash) {
                positions.retain(|&p| p != position);
                if positions.is_empty() {
                    self.reverse.remove(&hash);
                }
            }
        }
        self.oldest_position = position + 1;
    }

    /// Returns every still-live position that was admitted with `hash`, in
    /// ascending order.
    pub fn find_positions(&self, hash: WindowHash) -> &[HistoryPosition] {
        self.reverse
            .get(&hash)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the hash admitted at `position`, or `None` if it was never
    /// assigned or has since been evicted.
    pub fn get(&self, position: HistoryPosition) -> Option<WindowHash> {
        self.forward.get(&position).copied()
    }

    /// The position that will be assigned to the next admission.
    pub fn next_position(&self) -> HistoryPosition {
        self.next_position
    }

    /// The oldest position still live in the history (meaningless when
    /// empty, but monotonic and safe to read).
    pub fn oldest_position(&self) -> HistoryPosition {
        self.oldest_position
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
