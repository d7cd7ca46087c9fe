//! The actual per-line drive loop: read, classify, pre-filter, push,
//! write. Generic over the reader/writer so it runs identically whether
//! records come from stdin or a seekable `--input` file.

use std::io::{BufRead, Write};

use crate::cli::classifier::Classifier;
use crate::cli::error::Result;
use crate::cli::report::Progress;
use crate::cli::transform::Transform;
use crate::emitter::EmittedItem;
use crate::engine::Engine;
use crate::prefilter::PreFilter;

/// Consumes every line from `reader`, classifies it, runs tracked
/// records' hashed views through `prefilter` and an optional `transform`,
/// pushes them into `engine`, and writes whatever becomes emittable to
/// `writer` as it goes. Flushes the engine at EOS.
pub fn drive(
    reader: impl BufRead,
    mut writer: impl Write,
    engine: &mut Engine,
    classifier: &Classifier,
    prefilter: &PreFilter,
    mut transform: Option<Transform>,
    progress: Option<&Progress>,
) -> Result<()> {
    for line in reader.lines() {
        let line = line?;
        if let Some(progress) = progress {
            progress.advance(line.len() as u64 + 1);
        }

        let classification = classifier.classify(&line);
        let output_view = line.into_bytes();
        let hashed_view = prefilter.apply(&output_view);
        let hashed_view = match &mut transform {
            Some(transform) => transform.apply(&hashed_view)?,
            None => hashed_view,
        };

        let items = engine.push(output_view, hashed_view, classification)?;
        write_items(&mut writer, &items)?;
    }

    let items = engine.flush()?;
    write_items(&mut writer, &items)?;

    if let Some(transform) = transform {
        transform.finish()?;
    }
    Ok(())
}

fn write_items(writer: &mut impl Write, items: &[EmittedItem]) -> Result<()> {
    for item in items {
        match item {
            EmittedItem::Tracked(bytes) | EmittedItem::Bypassed(bytes) => {
                writer.write_all(bytes)?;
                writer.write_all(b"\n")?;
            }
            EmittedItem::Annotation(line) => {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
