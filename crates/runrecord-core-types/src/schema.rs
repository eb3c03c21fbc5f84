//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Snippet identifiers
pub const FIELD_SOURCE: &str = "source";
pub const FIELD_LANGUAGE: &str = "language";
pub const FIELD_ARTIFACT: &str = "artifact";
pub const FIELD_CAST: &str = "cast";
pub const FIELD_SNIPPET_NUMBER: &str = "snippet_number";

// Process results
pub const FIELD_EXIT_CODE: &str = "exit_code";
pub const FIELD_OUTPUT_BYTES: &str = "output_bytes";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
