//! runrecord engine - orchestration layer
//!
//! Runs snippets against real interpreters and coordinates the capture
//! cache and cast recorder for one build.
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging for `ensure_captured`, `execute`,
//! `record_cast` and `process_snippet`:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()`.

pub mod build;
pub mod capture;
pub mod cast;
pub mod exec;
pub mod manifest;

pub use build::{Build, BuildSettings, SnippetReport};
pub use capture::{ensure_captured, CaptureOutcome};
pub use cast::{record, SnippetCounter};
pub use exec::{execute, Invocation, ProcessRunner, RawOutput, SystemRunner};
pub use manifest::{load_manifest, SnippetManifest};
