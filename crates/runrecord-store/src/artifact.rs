//! Output artifacts
//!
//! An artifact is the authored snippet followed by its transformed output.
//! Its path is the cache key: once the file exists it is never rewritten by
//! a build, only removed by an explicit clean.

use crate::atomic::atomic_write;
use crate::errors::{io_error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Artifact text: authored lines, a newline, then the output verbatim
pub fn compose_artifact<S: AsRef<str>>(content: &[S], output: &str) -> String {
    let mut text = content
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    text.push('\n');
    text.push_str(output);
    text
}

/// Whether a captured artifact is already present
pub fn artifact_exists(path: &Path) -> bool {
    path.exists()
}

/// Write an artifact atomically, creating parent directories
///
/// Returns the number of bytes written.
pub fn write_artifact(path: &Path, text: &str) -> Result<usize> {
    atomic_write(path, text.as_bytes())?;
    Ok(text.len())
}

/// Remove an artifact so the next build captures it again
///
/// Returns `false` when there was nothing to remove.
pub fn remove_artifact(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "artifact removed");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error("remove_artifact", path, e)),
    }
}
