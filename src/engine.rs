//! The streaming deduplication engine: wires the hasher, history, delay
//! buffer, registry, candidate tracker, and emitter into the two entry
//! points a caller drives — [`Engine::push`] and [`Engine::flush`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::buffer::{BypassBuffer, BypassedRecord, OutputBuffer, Record};
use crate::config::EngineConfig;
use crate::delay::DelayBuffer;
use crate::emitter::{AnnotationFields, EmittedItem, Emitter};
use crate::error::{EngineError, Result};
use crate::hash::{hash_record, hash_window, RecordHash, WindowHash};
use crate::history::WindowHashHistory;
use crate::registry::{KnownSequence, KnownSequenceRegistry};
use crate::stats::Stats;
use crate::tracker::{CandidateTracker, Confirmation};

/// How an arriving record should be treated by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Participates in dedup: advances the hash pipeline and candidate
    /// tracker.
    Tracked,
    /// Passed through verbatim; interleaved at its arrival slot but never
    /// hashed or matched.
    Bypassed,
}

/// A previously discovered sequence, in the shape the engine imports and
/// exports it — format-agnostic, deliberately leaving persistence to the
/// caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedSequence {
    /// Number of records in the sequence.
    pub length: usize,
    /// All `length - W + 1` window hashes, in order.
    pub window_hashes: Vec<WindowHash>,
    /// Number of times this sequence was observed during the run that
    /// produced this export (`1` for an entry that was only ever
    /// preloaded and never re-matched).
    pub repeat_count: u64,
}

/// The streaming deduplication engine.
///
/// # Examples
///
/// ```
/// use uniqseq::config::EngineConfig;
/// use uniqseq::engine::{Classification, Engine};
///
/// let mut engine = Engine::new(EngineConfig::new(2)).unwrap();
/// let mut out = Vec::new();
/// for line in ["a", "b", "a", "b"] {
///     let items = engine
///         .push(line.as_bytes().to_vec(), line.as_bytes().to_vec(), Classification::Tracked)
///         .unwrap();
///     out.extend(items);
/// }
/// out.extend(engine.flush().unwrap());
/// assert_eq!(out.len(), 2); // "a", "b" emitted once; the repeat is skipped
/// ```
pub struct Engine {
    config: EngineConfig,
    history: WindowHashHistory,
    delay: DelayBuffer,
    registry: KnownSequenceRegistry,
    tracker: CandidateTracker,
    output_buffer: OutputBuffer,
    bypass_buffer: BypassBuffer,
    emitter: Emitter,
    rolling: VecDeque<RecordHash>,
    tracked_count: u64,
    buffer_base_index: u64,
    arrival_counter: u64,
    sequences_discovered: u64,
    stats: Stats,
}

impl Engine {
    /// Builds a new engine, validating `config` eagerly.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let emitter = Emitter::new(
            config.annotate,
            config.inverse_mode,
            config.annotation_template.clone(),
        );
        let window_size = config.window_size;
        Ok(Self {
            history: WindowHashHistory::new(config.max_history),
            delay: DelayBuffer::new(),
            registry: KnownSequenceRegistry::new(config.max_known_sequences),
            tracker: CandidateTracker::new(),
            output_buffer: OutputBuffer::new(),
            bypass_buffer: BypassBuffer::new(),
            emitter,
            rolling: VecDeque::with_capacity(window_size),
            tracked_count: 0,
            buffer_base_index: 0,
            arrival_counter: 0,
            sequences_discovered: 0,
            config,
            stats: Stats::default(),
        })
    }

    /// Preloads known sequences before processing begins. Preloaded
    /// entries are pinned: never evicted by registry capacity pressure.
    pub fn import_known_sequences(&mut self, sequences: impl IntoIterator<Item = ExportedSequence>) {
        for sequence in sequences {
            if sequence.window_hashes.is_empty() {
                continue;
            }
            let start_hash = sequence.window_hashes[0];
            let fingerprint = crate::hash::hash_sequence(sequence.length, &sequence.window_hashes);
            let mut known = KnownSequence::new(
                start_hash,
                fingerprint,
                sequence.length,
                sequence.window_hashes,
                None,
            );
            known.pinned = true;
            known.repeat_count = sequence.repeat_count.max(1);
            self.registry.insert(known);
            self.sequences_discovered += 1;
        }
    }

    /// Exports every known sequence currently held, for persistence by the
    /// caller.
    pub fn export_known_sequences(&self) -> Vec<ExportedSequence> {
        self.registry
            .iter()
            .map(|s| ExportedSequence {
                length: s.length,
                window_hashes: s.window_hashes.clone(),
                repeat_count: s.repeat_count,
            })
            .collect()
    }

    /// Pushes one record into the engine, returning whatever became
    /// available to write to the sink as a result (tracked emissions,
    /// bypassed records, and annotations, already interleaved in order).
    pub fn push(
        &mut self,
        output_view: Vec<u8>,
        hashed_view: Vec<u8>,
        classification: Classification,
    ) -> Result<Vec<EmittedItem>> {
        let arrival_order = self.arrival_counter;
        self.arrival_counter += 1;
        self.stats.total_records += 1;

        if classification == Classification::Bypassed {
            self.stats.bypassed_records += 1;
            self.bypass_buffer.push_back(BypassedRecord {
                arrival_order,
                output_view,
            });
            return Ok(Vec::new());
        }

        self.stats.tracked_records += 1;
        self.tracked_count += 1;

        let record_hash = hash_record(&hashed_view);
        self.output_buffer
            .push_back(Record::new(arrival_order, output_view, hashed_view));
        if self.rolling.len() == self.config.window_size {
            self.rolling.pop_front();
        }
        self.rolling.push_back(record_hash);

        let mut out = Vec::new();
        if self.rolling.len() == self.config.window_size {
            let window_hashes: Vec<RecordHash> = self.rolling.iter().copied().collect();
            let window_hash = hash_window(&window_hashes);
            let window_size = self.config.window_size as u64;
            let window_start_index = self.tracked_count - window_size;

            let mut confirmations = self
                .tracker
                .advance(window_hash, &self.history, &mut self.registry);
            confirmations.extend(self.tracker.start_new(
                window_start_index,
                self.config.window_size,
                window_hash,
                &self.history,
                &mut self.registry,
            ));
            self.resolve_confirmations(confirmations, &mut out)?;

            if let Some(pending) = self.delay.take() {
                self.history.append(pending);
            }
            self.delay.set(window_hash);
        }

        self.emit_up_to_high_water_mark(&mut out)?;
        Ok(out)
    }

    /// Resolves any remaining in-flight state and drains every buffered
    /// record, bypassed or tracked, in arrival order.
    pub fn flush(&mut self) -> Result<Vec<EmittedItem>> {
        let mut out = Vec::new();
        let confirmations =
            self.tracker
                .finalize_at_eos(self.tracked_count, self.config.window_size, &mut self.registry);
        self.resolve_confirmations(confirmations, &mut out)?;

        while let Some(record) = self.output_buffer.pop_front() {
            self.buffer_base_index += 1;
            self.emitter
                .drain_due_bypass(&mut self.bypass_buffer, Some(record.arrival_order), &mut out);
            self.stats.emitted += 1;
            self.emitter.emit_unskipped(record, &mut out);
        }
        self.emitter.drain_due_bypass(&mut self.bypass_buffer, None, &mut out);
        Ok(out)
    }

    /// A snapshot of the engine's run counters.
    pub fn stats(&self) -> Stats {
        Stats {
            known_sequences: self.registry.len() as u64,
            sequences_discovered: self.sequences_discovered,
            ..self.stats
        }
    }

    fn resolve_confirmations(
        &mut self,
        mut confirmations: Vec<Confirmation>,
        out: &mut Vec<EmittedItem>,
    ) -> Result<()> {
        confirmations.sort_by_key(|c| c.start_input_index);
        for confirmation in confirmations {
            if confirmation.start_input_index != self.buffer_base_index {
                return Err(EngineError::invariant(format!(
                    "confirmed duplicate at input index {} does not align with buffer front {}",
                    confirmation.start_input_index, self.buffer_base_index
                )));
            }
            if confirmation.newly_discovered {
                self.sequences_discovered += 1;
            }
            self.stats.skipped += confirmation.len as u64;
            self.buffer_base_index += confirmation.len as u64;

            let mut claimed = Vec::with_capacity(confirmation.len);
            for _ in 0..confirmation.len {
                match self.output_buffer.pop_front() {
                    Some(record) => claimed.push(record),
                    None => {
                        return Err(EngineError::invariant(
                            "confirmed duplicate range exceeds buffered records",
                        ))
                    }
                }
            }
            if let Some(first) = claimed.first() {
                self.emitter.drain_due_bypass(
                    &mut self.bypass_buffer,
                    Some(first.arrival_order),
                    out,
                );
            }
            let fields = AnnotationFields {
                start: confirmation.start_input_index + 1,
                end: confirmation.start_input_index + confirmation.len as u64,
                match_start: confirmation.reference_start_index.map(|s| s + 1),
                match_end: confirmation
                    .reference_start_index
                    .zip(confirmation.reference_len)
                    .map(|(s, len)| s + len as u64),
                count: confirmation.occurrence_count,
                window_size: self.config.window_size,
            };
            self.emitter.emit_skipped_range(claimed, fields, out);
        }
        Ok(())
    }

    fn emit_up_to_high_water_mark(&mut self, out: &mut Vec<EmittedItem>) -> Result<()> {
        // Beyond whatever an active hypothesis is holding, the trailing
        // `W - 1` records must stay buffered too: they could still turn out
        // to be the start of the next window, and that window won't be
        // checked against history until one more record arrives.
        let hypothesis_depth = self
            .tracker
            .high_water_mark()
            .saturating_sub(self.buffer_base_index);
        let floor = (self.config.window_size as u64).saturating_sub(1);
        let depth_to_keep = hypothesis_depth.max(floor);
        while self.output_buffer.len() as u64 > depth_to_keep {
            let record = self
                .output_buffer
                .pop_front()
                .ok_or_else(|| EngineError::invariant("output buffer emptied unexpectedly"))?;
            self.buffer_base_index += 1;
            self.emitter
                .drain_due_bypass(&mut self.bypass_buffer, Some(record.arrival_order), out);
            self.stats.emitted += 1;
            self.emitter.emit_unskipped(record, out);
        }
        Ok(())
    }
}
