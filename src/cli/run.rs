//! Wires argument parsing, classification, the transform bridge, the
//! known-sequence library, and the engine itself into the end-to-end CLI
//! run loop.

use std::fs::File;
use std::io::{self, BufReader, Write};

use tracing::debug;

use crate::cli::args::Cli;
use crate::cli::classifier::Classifier;
use crate::cli::error::Result;
use crate::cli::library_io;
use crate::cli::report::{render_summary, Progress};
use crate::cli::run_loop::drive;
use crate::cli::transform::Transform;
use crate::engine::Engine;
use crate::prefilter::PreFilter;

/// Runs the CLI end to end against `cli`'s parsed arguments, reading from
/// stdin or `--input`, writing to stdout, and reporting to stderr.
///
/// Returns `Ok(())` on a clean run; any failure — a bad pattern, a
/// misbehaving transform, a malformed library file, or an engine
/// invariant violation — is returned rather than exiting the process, so
/// `main` stays the only place that turns an error into an exit code.
pub fn run(cli: Cli) -> Result<()> {
    let mut engine = Engine::new(cli.engine_config())?;

    if let Some(path) = &cli.library_load {
        let sequences = library_io::load(path)?;
        debug!(count = sequences.len(), "preloading known sequences");
        engine.import_known_sequences(sequences);
    }

    let classifier = if cli.track_patterns.is_empty() && cli.bypass_patterns.is_empty() {
        Classifier::track_everything()
    } else {
        Classifier::new(&cli.track_patterns, &cli.bypass_patterns)?
    };

    let transform = cli.transform.as_deref().map(Transform::spawn).transpose()?;
    let prefilter = PreFilter::new(cli.skip_chars);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let progress = match &cli.input {
        Some(path) => {
            let file = File::open(path)?;
            let total = if cli.progress {
                file.metadata().ok().map(|m| m.len())
            } else {
                None
            };
            let progress = Progress::new(total);
            let mut reader = BufReader::new(file);
            drive(&mut reader, &mut out, &mut engine, &classifier, &prefilter, transform, Some(&progress))?;
            Some(progress)
        }
        None => {
            let stdin = io::stdin();
            let mut reader = stdin.lock();
            drive(&mut reader, &mut out, &mut engine, &classifier, &prefilter, transform, None)?;
            None
        }
    };
    out.flush()?;
    if let Some(progress) = progress {
        progress.finish();
    }

    if let Some(path) = &cli.library_save {
        library_io::save(path, engine.export_known_sequences())?;
    }

    if cli.stats {
        eprintln!("{}", render_summary(&engine.stats()));
    }

    Ok(())
}
