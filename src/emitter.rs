//! Policy for writing resolved records to the sink: merges tracked
//! emissions with bypassed records by arrival order, renders annotations,
//! and applies the inverse-mode emit/skip flip.

use crate::buffer::{BypassBuffer, Record};

/// One item the emitter hands the sink, in final output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmittedItem {
    /// A tracked record's output view, unmodified.
    Tracked(Vec<u8>),
    /// A bypassed record's output view, unmodified.
    Bypassed(Vec<u8>),
    /// A rendered annotation line describing a skip just resolved.
    Annotation(String),
}

/// Fields available to [`Emitter::render_annotation`], named after the
/// template placeholders in the external interface.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationFields {
    /// First tracked-record index of the skipped range (1-based).
    pub start: u64,
    /// Last tracked-record index of the skipped range (1-based, inclusive).
    pub end: u64,
    /// First tracked-record index of the matched earlier occurrence, if
    /// known (1-based).
    pub match_start: Option<u64>,
    /// Last tracked-record index of the matched earlier occurrence, if
    /// known (1-based, inclusive).
    pub match_end: Option<u64>,
    /// Number of times this sequence has now been observed.
    pub count: u64,
    /// Configured window size.
    pub window_size: usize,
}

/// Default annotation template used when the caller doesn't supply one.
pub const DEFAULT_ANNOTATION_TEMPLATE: &str =
    "[dedup] skipped records {start}-{end} (matches {match_start}-{match_end}, seen {count}x, W={window_size})";

/// Stateless-per-record policy wrapping the annotate/inverse-mode toggles.
#[derive(Debug, Clone)]
pub struct Emitter {
    annotate: bool,
    inverse_mode: bool,
    annotation_template: String,
}

impl Emitter {
    /// Builds an emitter. Annotations are forced off in inverse mode,
    /// matching the external-interface contract.
    pub fn new(annotate: bool, inverse_mode: bool, annotation_template: String) -> Self {
        Self {
            annotate: annotate && !inverse_mode,
            inverse_mode,
            annotation_template,
        }
    }

    /// Whether a tracked record that would normally be *emitted* should
    /// actually be written out, after applying the inverse-mode flip.
    pub fn should_emit_unskipped(&self) -> bool {
        !self.inverse_mode
    }

    /// Whether a tracked record that was *confirmed as a duplicate*
    /// (would normally be skipped) should actually be written out, after
    /// applying the inverse-mode flip.
    pub fn should_emit_skipped(&self) -> bool {
        self.inverse_mode
    }

    /// Renders an annotation line for a resolved skip, or `None` if
    /// annotations are disabled.
    pub fn render_annotation(&self, fields: AnnotationFields) -> Option<String> {
        if !self.annotate {
            return None;
        }
        let render_opt = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string());
        let rendered = self
            .annotation_template
            .replace("{start}", &fields.start.to_string())
            .replace("{end}", &fields.end.to_string())
            .replace("{match_start}", &render_opt(fields.match_start))
            .replace("{match_end}", &render_opt(fields.match_end))
            .replace("{count}", &fields.count.to_string())
            .replace("{window_size}", &fields.window_size.to_string());
        Some(rendered)
    }

    /// Drains every bypassed record that is due: arrived strictly before
    /// `next_tracked_arrival` (or, if `None`, every remaining one — there
    /// is no further tracked record to wait on).
    pub fn drain_due_bypass(
        &self,
        bypass: &mut BypassBuffer,
        next_tracked_arrival: Option<u64>,
        out: &mut Vec<EmittedItem>,
    ) {
        loop {
            let due = match (bypass.peek_arrival_order(), next_tracked_arrival) {
                (Some(arrival), Some(next)) => arrival < next,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if !due {
                break;
            }
            if let Some(record) = bypass.pop_front() {
                out.push(EmittedItem::Bypassed(record.output_view));
            }
        }
    }

    /// Emits a single tracked record that was not claimed by any confirmed
    /// duplicate.
    pub fn emit_unskipped(&self, record: Record, out: &mut Vec<EmittedItem>) {
        if self.should_emit_unskipped() {
            out.push(EmittedItem::Tracked(record.output_view));
        }
    }

    /// Emits (or, in inverse mode, suppresses) a range of tracked records
    /// claimed by a confirmed duplicate, and appends an annotation if
    /// configured.
    pub fn emit_skipped_range(
        &self,
        records: Vec<Record>,
        fields: AnnotationFields,
        out: &mut Vec<EmittedItem>,
    ) {
        if self.should_emit_skipped() {
            for record in records {
                out.push(EmittedItem::Tracked(record.output_view));
            }
            return;
        }
        if let Some(annotation) = self.render_annotation(fields) {
            out.push(EmittedItem::Annotation(annotation));
        }
    }
}
