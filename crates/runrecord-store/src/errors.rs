//! Error handling for runrecord-store
//!
//! Wraps runrecord-core RrError with store-specific helpers

use runrecord_core::errors::{RrError, RrErrorKind};
use std::path::Path;

/// Result type alias using RrError
pub type Result<T> = std::result::Result<T, RrError>;

/// Create an IO error naming the operation and the path involved
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> RrError {
    RrError::new(RrErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message(err.to_string())
}

/// Create an error for a path the store cannot work with
pub fn invalid_path(operation: &str, path: &Path, reason: &str) -> RrError {
    RrError::new(RrErrorKind::InvalidConfig)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message(reason.to_string())
}
