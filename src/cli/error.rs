//! Error type for the command-line layer: everything that can go wrong
//! above the engine, each variant wrapping its collaborator's error type
//! with `#[from]`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the `uniqseq` binary and its supporting modules.
#[derive(Debug, Error)]
pub enum CliError {
    /// A configuration or invariant failure from the core engine.
    #[error(transparent)]
    Engine(#[from] crate::error::EngineError),

    /// Filesystem or stdio failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A `--track`/`--bypass` pattern failed to compile.
    #[error("invalid classification pattern {pattern:?}: {source}")]
    Pattern {
        /// The offending pattern text.
        pattern: String,
        /// Underlying compile error.
        #[source]
        source: regex::Error,
    },

    /// The configured transform subprocess misbehaved.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The on-disk known-sequence library could not be read or written.
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Errors specific to the external pre-filter transform subprocess.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The subprocess could not be spawned at all.
    #[error("failed to spawn transform command {command:?}: {source}")]
    Spawn {
        /// The command line that failed to spawn.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The subprocess's stdin or stdout could not be captured.
    #[error("transform command {command:?} did not expose a usable stdin/stdout pipe")]
    Pipe {
        /// The command line whose pipes were unusable.
        command: String,
    },

    /// The subprocess produced a different number of output lines than it
    /// was given input lines. This is the collaborator's contract
    /// violation, not an engine failure.
    #[error(
        "transform command {command:?} violated the one-output-per-input contract: \
         sent {sent} lines, received {received}"
    )]
    LineCountMismatch {
        /// The command line that violated the contract.
        command: String,
        /// Number of lines written to the subprocess's stdin.
        sent: usize,
        /// Number of lines read back from the subprocess's stdout.
        received: usize,
    },

    /// The subprocess exited with a non-zero status.
    #[error("transform command {command:?} exited with status {status}")]
    NonZeroExit {
        /// The command line that failed.
        command: String,
        /// The process's exit status, rendered.
        status: String,
    },
}

/// Errors specific to loading or saving the on-disk known-sequence library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The library file exists but its contents are not valid JSON, or
    /// don't match the expected shape.
    #[error("malformed known-sequence library at {path}: {source}")]
    Malformed {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem failure reading or writing the library or its metadata
    /// sidecar.
    #[error("i/o error accessing known-sequence library at {path}: {source}")]
    Io {
        /// Path being accessed when the failure occurred.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout the CLI layer.
pub type Result<T> = std::result::Result<T, CliError>;
