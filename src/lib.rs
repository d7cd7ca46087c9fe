//! # uniqseq - streaming multi-record sequence deduplication
//!
//! `uniqseq` recognizes repeated *runs* of records in a stream, not just
//! repeated single lines, and skips the repeat while leaving the first
//! occurrence untouched. It runs over unbounded input in a single forward
//! pass, with bounded memory if the caller asks for it.
//!
//! ## Quick Start
//!
//! ```rust
//! use uniqseq::config::EngineConfig;
//! use uniqseq::engine::{Classification, Engine};
//!
//! let mut engine = Engine::new(EngineConfig::new(3)).unwrap();
//! let mut out = Vec::new();
//! for line in ["A", "B", "C", "A", "B", "C", "D"] {
//!     let view = line.as_bytes().to_vec();
//!     out.extend(engine.push(view.clone(), view, Classification::Tracked).unwrap());
//! }
//! out.extend(engine.flush().unwrap());
//! assert_eq!(out.len(), 4); // A, B, C, D: the second A-B-C run is skipped
//! ```
//!
//! ## Architecture
//!
//! The engine is a pipeline of small, independently testable pieces:
//!
//! - **Pre-filter** ([`prefilter`]): normalizes a record's hashed view
//!   (prefix skip, optional transform) before it ever reaches a hasher.
//! - **Hashing** ([`hash`]): record hashes roll into window hashes, which
//!   roll into sequence fingerprints once a run is confirmed.
//! - **History** ([`history`]) and **delay buffer** ([`delay`]): a
//!   position-indexed, FIFO-evicted log of past window hashes, admitted
//!   one step late so a window can never match itself.
//! - **Registry** ([`registry`]): the recency-bounded table of previously
//!   confirmed sequences, so a second occurrence is recognized directly
//!   instead of being re-discovered from history.
//! - **Candidates** ([`candidate`]) and the **tracker** ([`tracker`]): the
//!   per-record state machine that advances, finalizes, and starts
//!   hypotheses about what's repeating.
//! - **Buffers and emission** ([`buffer`], [`emitter`]): the tracked
//!   output FIFO and bypass side channel, merged back into arrival order.
//! - **Engine** ([`engine`]): wires all of the above behind `push`/`flush`.
//! - **Stats** ([`stats`]) and **config** ([`config`]) round out the
//!   collaborator-visible surface.
//!
//! The [`cli`] module layers a line-oriented command-line tool on top:
//! classification by regex, an external transform subprocess, a
//! persisted known-sequence library, and progress reporting.

pub mod buffer;
pub mod candidate;
pub mod cli;
pub mod config;
pub mod delay;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod hash;
pub mod history;
pub mod prefilter;
pub mod registry;
pub mod stats;
pub mod tracker;

pub use crate::config::EngineConfig;
pub use crate::engine::{Classification, Engine, ExportedSequence};
pub use crate::error::{EngineError, Result};
pub use crate::stats::Stats;
