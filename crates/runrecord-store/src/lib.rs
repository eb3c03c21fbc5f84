//! runrecord store - filesystem side of capture and cast recording
//!
//! Provides:
//! - Atomic, write-once output artifacts
//! - Append-only cast scripts and listings
//! - Cleanup of cast directories and artifacts

pub mod artifact;
pub mod atomic;
pub mod cast_files;
pub mod clean;
pub mod errors;

// Re-export key types
pub use errors::Result;
