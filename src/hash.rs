//! Deterministic, collision-resistant digests over records and windows.
//!
//! Three digest kinds are produced here, widening as they cover more
//! content: [`RecordHash`] over one record's hashed view, [`WindowHash`]
//! over `W` consecutive record hashes, and [`SequenceFingerprint`] over an
//! entire known sequence. All three are pure functions of their inputs —
//! same bytes in, same digest out, no shared state.

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use std::hash::{BuildHasher, Hasher};
use xxhash_rust::xxh3::Xxh3Builder;

/// 64-bit digest of a single record's hashed view.
///
/// A keyed SipHash is sufficient at this width: the keying makes
/// second-preimage construction impractical for the adversarial-input case
/// called out in the hasher's contract, and 64 bits keeps per-record
/// overhead small since records are the hottest path in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordHash(pub u64);

/// 128-bit digest over `W` consecutive [`RecordHash`]es.
///
/// Widened relative to `RecordHash` because a window hash is the key used
/// to anchor history lookups and known-sequence matches for the lifetime
/// of a run; collisions here would misroute candidates rather than merely
/// mislabel one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowHash(pub u128);

/// Digest identifying a whole [`crate::registry::KnownSequence`] by its
/// length and the ordered list of window hashes it comprises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceFingerprint(pub u128);

/// Secret keys mixed into every digest so that adversarially crafted input
/// cannot force collisions chosen ahead of time. Fixed rather than
/// per-instance random: the engine's output must be reproducible across
/// runs on the same input, and the known-sequence library is meant to be
/// portable across processes.
const RECORD_KEY0: u64 = 0x5be8_6c22_50f2_fe51;
const RECORD_KEY1: u64 = 0x7c9e_6e9f_e9d6_39a7;
const WINDOW_SEED: u64 = 0x9e37_79b9_7f4a_7c15;
const SEQUENCE_SEED: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// Digests the hashed view of a single record.
///
/// `view` is whatever the pre-filter produced (skip-chars + transform
/// applied); the engine never sees the original output view here.
pub fn hash_record(view: &[u8]) -> RecordHash {
    let mut hasher = SipHasher13::new_with_keys(RECORD_KEY0, RECORD_KEY1);
    hasher.write(view);
    RecordHash(hasher.finish())
}

/// Digests the concatenation of `W` record hashes into a single window
/// hash.
///
/// `record_hashes` must contain exactly the window's `W` hashes in order;
/// the caller (the candidate tracker) is responsible for windowing.
pub fn hash_window(record_hashes: &[RecordHash]) -> WindowHash {
    let builder = Xxh3Builder::new().with_seed(WINDOW_SEED);
    let mut hasher = builder.build_hasher();
    for rh in record_hashes {
        hasher.write_u64(rh.0);
    }
    // xxh3's `Hasher::finish` only exposes 64 bits; fold in a second pass
    // keyed differently to reach the required 128-bit width.
    let low = hasher.finish();
    let mut high_hasher = builder.build_hasher();
    high_hasher.write_u64(WINDOW_SEED ^ low);
    for rh in record_hashes {
        high_hasher.write_u64(rh.0.rotate_left(17));
    }
    let high = high_hasher.finish();
    WindowHash((u128::from(high) << 64) | u128::from(low))
}

/// Digests the encoded form of a sequence's length and its ordered list of
/// window hashes, producing the identity used by the known-sequence
/// registry.
pub fn hash_sequence(length: usize, window_hashes: &[WindowHash]) -> SequenceFingerprint {
    let builder = Xxh3Builder::new().with_seed(SEQUENCE_SEED);
    let mut hasher = builder.build_hasher();
    hasher.write_u64(length as u64);
    for wh in window_hashes {
        hasher.write_u128(wh.0);
    }
    let low = hasher.finish();
    let mut high_hasher = builder.build_hasher();
    high_hasher.write_u64(SEQUENCE_SEED ^ low);
    high_hasher.write_u64(length as u64);
    for wh in window_hashes {
        high_hasher.write_u128(wh.0.rotate_left(31));
    }
    let high = high_hasher.finish();
    SequenceFingerprint((u128::from(high) << 64) | u128::from(low))
}
