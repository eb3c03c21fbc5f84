//! runrecord core - snippet model and pure transformations
//!
//! This crate provides everything about a snippet that does not touch a
//! process or the filesystem:
//! - Language registry with built-in defaults and configuration overrides
//! - Prompt stripping and input/output encodings
//! - Sed-like replace rules applied to captured output
//! - Shell quoting for cast scripts
//! - Snippet requests, the raw directive options they are built from, and
//!   the build configuration
//! - The error and logging facilities shared by the other crates

pub mod config;
pub mod directive;
pub mod encoding;
pub mod errors;
pub mod extract;
pub mod language;
pub mod logging_facility;
pub mod quote;
pub mod request;
pub mod transform;

pub use runrecord_core_types as core_types;

// Re-export commonly used types
pub use config::RunRecordConfig;
pub use directive::{Layout, SnippetDirective};
pub use errors::{Result, RrError, RrErrorKind, RunRecordError};
pub use language::{LanguageEntry, LanguageRegistry};
pub use request::SnippetRequest;
pub use runrecord_core_types::SourceLocation;
pub use transform::ReplaceRule;
