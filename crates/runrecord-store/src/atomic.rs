//! Atomic write primitives
//!
//! Uses temp→rename so a reader never observes a partially written file.
//! The temp file lives next to the target, so the rename stays on one
//! filesystem.

use crate::errors::{invalid_path, io_error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix of in-flight temp files
pub const TEMP_SUFFIX: &str = ".runrecord-tmp";

/// Temp path used while writing `target_path`
pub fn temp_path_for(target_path: &Path) -> Result<PathBuf> {
    let name = target_path
        .file_name()
        .ok_or_else(|| invalid_path("atomic_write", target_path, "path has no file name"))?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(name);
    temp_name.push(TEMP_SUFFIX);
    Ok(target_path.with_file_name(temp_name))
}

/// Atomically write bytes to a file, creating parent directories
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("create_dir", parent, e))?;
        }
    }

    let temp_path = temp_path_for(target_path)?;

    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("write_temp", &temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_temp", target_path, e));
    }

    tracing::debug!(path = %target_path.display(), bytes = content.len(), "atomic write");
    Ok(())
}
