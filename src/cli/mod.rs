//! Command-line layer built on top of the [`crate::engine`] core: argument
//! parsing, track/bypass classification, the transform subprocess bridge,
//! the on-disk known-sequence library, and stats/progress presentation.
//!
//! Nothing in here is required to use the engine as a library; a caller
//! embedding `uniqseq` can ignore this module entirely and drive
//! [`crate::engine::Engine`] directly.

pub mod args;
pub mod classifier;
pub mod error;
pub mod library_io;
pub mod report;
pub mod run;
mod run_loop;
pub mod transform;

pub use args::Cli;
pub use error::{CliError, Result};
pub use run::run;
