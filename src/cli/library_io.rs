//! On-disk known-sequence library: a JSON snapshot of exported sequences
//! plus a metadata sidecar recording when it was last saved.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::cli::error::{LibraryError, Result};
use crate::engine::ExportedSequence;

/// On-disk shape of the library file: sequences plus the metadata saved
/// alongside them.
#[derive(Debug, Serialize, Deserialize)]
struct LibraryFile {
    meta: LibraryMeta,
    sequences: Vec<ExportedSequence>,
}

/// Metadata recorded every time a library is saved.
#[derive(Debug, Serialize, Deserialize)]
pub struct LibraryMeta {
    /// RFC3339 timestamp of the save that produced this file.
    pub saved_at: String,
    /// Number of sequences in this snapshot, for a quick sanity check
    /// without parsing the whole body.
    pub sequence_count: usize,
}

/// Loads a previously saved library, or an empty one if `path` doesn't
/// exist yet (a missing library is not an error: the first run of a
/// fresh pipeline has nothing to preload).
pub fn load(path: &Path) -> Result<Vec<ExportedSequence>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: LibraryFile =
        serde_json::from_str(&raw).map_err(|source| LibraryError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), sequences = file.sequences.len(), "loaded known-sequence library");
    Ok(file.sequences)
}

/// Saves `sequences` to `path`, overwriting whatever was there, stamped
/// with the current time.
pub fn save(path: &Path, sequences: Vec<ExportedSequence>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| LibraryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    let file = LibraryFile {
        meta: LibraryMeta {
            saved_at: OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            sequence_count: sequences.len(),
        },
        sequences,
    };
    let rendered = serde_json::to_string_pretty(&file).map_err(|source| LibraryError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, rendered).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let meta_path = metadata_path(path);
    fs::write(&meta_path, &file.meta.saved_at).map_err(|source| LibraryError::Io {
        path: meta_path,
        source,
    })?;

    info!(path = %path.display(), sequences = file.meta.sequence_count, "saved known-sequence library");
    Ok(())
}

/// Path of the small sidecar file recording a library's last save time in
/// plain text, for tools that want to check freshness without parsing the
/// library's JSON body.
pub fn metadata_path(library_path: &Path) -> PathBuf {
    let mut name = library_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".meta");
    library_path.with_file_name(name)
}
