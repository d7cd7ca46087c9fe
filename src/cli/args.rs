//! Command-line argument definitions: a CLI-facing options struct, kept
//! separate from the engine config it is converted into.

use std::path::PathBuf;

use clap::Parser;

use crate::config::EngineConfig;
use crate::emitter::DEFAULT_ANNOTATION_TEMPLATE;

/// Streaming deduplication of repeated multi-record sequences.
///
/// Reads records from stdin (one per line by default) and writes the
/// deduplicated stream to stdout: the first occurrence of any repeated
/// run of `--window-size` or more records is kept, later occurrences are
/// skipped.
#[derive(Debug, Parser)]
#[command(name = "uniqseq", version, about)]
pub struct Cli {
    /// Minimum window length, in records, a duplicate run must span.
    #[arg(short = 'w', long, default_value_t = 3, env = "UNIQSEQ_WINDOW_SIZE")]
    pub window_size: usize,

    /// Bound on the number of historic window hashes retained. Omit for
    /// unbounded history.
    #[arg(long)]
    pub max_history: Option<usize>,

    /// Bound on the number of distinct known sequences retained.
    #[arg(long, default_value_t = 1 << 16)]
    pub max_known_sequences: usize,

    /// Emit skipped records instead of suppressing them, and suppress
    /// what would otherwise be kept. Disables annotations.
    #[arg(long)]
    pub inverse: bool,

    /// Interleave an annotation line at each confirmed duplicate range.
    #[arg(long)]
    pub annotate: bool,

    /// Template used to render annotation lines. See the crate
    /// documentation for the supported `{placeholder}` fields.
    #[arg(long, default_value = DEFAULT_ANNOTATION_TEMPLATE)]
    pub annotation_template: String,

    /// Regex a record's text must match to be tracked (participate in
    /// dedup). May be repeated; first matching pattern wins. Records
    /// matching no `--track`/`--bypass` pattern default to tracked.
    #[arg(long = "track", value_name = "REGEX")]
    pub track_patterns: Vec<String>,

    /// Regex a record's text must match to be bypassed (passed through
    /// verbatim, never hashed). May be repeated; evaluated in the same
    /// first-match-wins order as `--track`, interleaved by position on
    /// the command line.
    #[arg(long = "bypass", value_name = "REGEX")]
    pub bypass_patterns: Vec<String>,

    /// External command each tracked record's hashed view is piped
    /// through, one line in, one line out, before hashing. The record's
    /// emitted output is never affected.
    #[arg(long)]
    pub transform: Option<String>,

    /// Number of leading bytes to drop from a record's hashed view
    /// before hashing (and before any `--transform`).
    #[arg(long, default_value_t = 0)]
    pub skip_chars: usize,

    /// Path to a JSON known-sequence library to preload before
    /// processing begins.
    #[arg(long)]
    pub library_load: Option<PathBuf>,

    /// Path to write the known-sequence library (preloaded entries plus
    /// anything discovered this run) to at EOS.
    #[arg(long)]
    pub library_save: Option<PathBuf>,

    /// Print a summary of counts and the redundancy ratio to stderr at
    /// EOS.
    #[arg(long)]
    pub stats: bool,

    /// Render a progress bar on stderr while consuming a seekable input
    /// file. Ignored when reading from a pipe.
    #[arg(long)]
    pub progress: bool,

    /// Read records from this file instead of stdin.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl Cli {
    /// Splits this CLI invocation into the engine's config and the
    /// ambient collaborator settings the CLI layer owns directly.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            window_size: self.window_size,
            max_history: self.max_history,
            max_known_sequences: self.max_known_sequences,
            inverse_mode: self.inverse,
            annotate: self.annotate,
            annotation_template: self.annotation_template.clone(),
        }
    }
}
