//! Clean step run before a from-scratch build
//!
//! Cast files only ever grow, so a rebuild that should not duplicate entries
//! must empty the cast directory first. Artifacts are removed only on
//! request, since keeping them is what makes a rebuild skip execution.

use crate::artifact::remove_artifact;
use crate::errors::{io_error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Delete everything inside `cast_dir`, keeping the directory itself
///
/// Returns the number of top-level entries removed. A missing directory is
/// already clean.
pub fn clean_cast_dir(cast_dir: &Path) -> Result<usize> {
    let entries = match fs::read_dir(cast_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(io_error("read_cast_dir", cast_dir, e)),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| io_error("read_cast_dir", cast_dir, e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| io_error("read_cast_dir", &path, e))?;

        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| io_error("remove_cast_dir", &path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| io_error("remove_cast_file", &path, e))?;
        }
        removed += 1;
    }

    tracing::debug!(path = %cast_dir.display(), removed, "cast directory cleaned");
    Ok(removed)
}

/// Delete the given artifacts, returning how many existed
pub fn clean_artifacts<'a, I>(artifacts: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut removed = 0;
    for path in artifacts {
        if remove_artifact(path)? {
            removed += 1;
        }
    }
    Ok(removed)
}
