//! Error facility
//!
//! `RunRecordError` names the precise failure inside core functions;
//! `RrError` is the structured form the store, engine and CLI pass around,
//! carrying a stable code plus the snippet location when one is known.

use runrecord_core_types::SourceLocation;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using RunRecordError
pub type Result<T> = std::result::Result<T, RunRecordError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure a build can surface maps onto one of these kinds, and each
/// kind has a stable code usable in tests and tooling output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RrErrorKind {
    // Snippet resolution
    UnknownLanguage,
    MalformedReplaceRule,
    InvalidPattern,
    MalformedEnvLine,

    // Execution
    UnexpectedExitCode,
    Encoding,

    // Setup
    InvalidConfig,

    // Integration/IO
    Io,

    // Internal
    Internal,
}

impl RrErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            RrErrorKind::UnknownLanguage => "ERR_UNKNOWN_LANGUAGE",
            RrErrorKind::MalformedReplaceRule => "ERR_MALFORMED_REPLACE_RULE",
            RrErrorKind::InvalidPattern => "ERR_INVALID_PATTERN",
            RrErrorKind::MalformedEnvLine => "ERR_MALFORMED_ENV_LINE",
            RrErrorKind::UnexpectedExitCode => "ERR_UNEXPECTED_EXIT_CODE",
            RrErrorKind::Encoding => "ERR_ENCODING",
            RrErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            RrErrorKind::Io => "ERR_IO",
            RrErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the context a user needs to find the
/// failing snippet: the operation, the snippet's source location and the
/// filesystem path involved, if any.
#[derive(Debug, Clone)]
pub struct RrError {
    kind: RrErrorKind,
    op: Option<String>,
    location: Option<SourceLocation>,
    path: Option<PathBuf>,
    exit_code: Option<i32>,
    message: String,
}

impl RrError {
    /// Create a new error with the specified kind
    pub fn new(kind: RrErrorKind) -> Self {
        Self {
            kind,
            op: None,
            location: None,
            path: None,
            exit_code: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the snippet's source location
    ///
    /// An already attached location is kept, since it is the more precise one.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        if self.location.is_none() {
            self.location = Some(location);
        }
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add the observed exit code
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> RrErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the snippet location, if any
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the observed exit code, if any
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for RrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(location) = &self.location {
            write!(f, " (at {})", location)?;
        }
        Ok(())
    }
}

impl std::error::Error for RrError {}

// ========== End Error Facility ==========

/// Precise error taxonomy for capture and cast operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunRecordError {
    /// Requested language tag is not in the registry
    #[error("Unknown language {language}")]
    UnknownLanguage { language: String },

    /// Interpreter exit code differs from the snippet's expectation
    #[error("Executing runrecord {location} yielded unexpected exitcode {actual} (expected {expected})")]
    UnexpectedExitCode {
        location: SourceLocation,
        expected: i32,
        actual: i32,
    },

    /// Per-snippet replace rule violates the delimiter syntax
    #[error("Malformed replace rule {rule:?}: {reason}")]
    MalformedReplaceRule { rule: String, reason: String },

    /// Replace pattern or replacement template is invalid
    #[error("Invalid replace pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Per-snippet environment line lacks a `=`
    #[error("Malformed env line {line:?}: expected KEY=VALUE")]
    MalformedEnvLine { line: String },

    /// Encoding label not known
    #[error("Unknown encoding {label:?}")]
    UnknownEncoding { label: String },

    /// Text not representable, or bytes not decodable, in an encoding
    #[error("Encoding error ({encoding}): {reason}")]
    Encoding { encoding: String, reason: String },

    /// Configuration cannot be loaded or is inconsistent
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Filesystem or process I/O failure
    #[error("I/O error during {op} on {}: {message}", .path.display())]
    Io {
        op: String,
        path: PathBuf,
        message: String,
    },
}

impl RunRecordError {
    /// Build an `Io` variant from a std error
    pub fn io(op: impl Into<String>, path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        RunRecordError::Io {
            op: op.into(),
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Conversion from RunRecordError to RrError
impl From<RunRecordError> for RrError {
    fn from(err: RunRecordError) -> Self {
        let text = err.to_string();
        match err {
            RunRecordError::UnknownLanguage { .. } => {
                RrError::new(RrErrorKind::UnknownLanguage).with_message(text)
            }

            RunRecordError::UnexpectedExitCode {
                location,
                expected,
                actual,
            } => RrError::new(RrErrorKind::UnexpectedExitCode)
                .with_op("execute")
                .with_location(location)
                .with_exit_code(actual)
                .with_message(format!(
                    "yielded unexpected exitcode {} (expected {})",
                    actual, expected
                )),

            RunRecordError::MalformedReplaceRule { .. } => {
                RrError::new(RrErrorKind::MalformedReplaceRule)
                    .with_op("parse_replace_rules")
                    .with_message(text)
            }

            RunRecordError::InvalidPattern { .. } => {
                RrError::new(RrErrorKind::InvalidPattern).with_message(text)
            }

            RunRecordError::MalformedEnvLine { .. } => RrError::new(RrErrorKind::MalformedEnvLine)
                .with_op("parse_env_lines")
                .with_message(text),

            RunRecordError::UnknownEncoding { .. } | RunRecordError::Encoding { .. } => {
                RrError::new(RrErrorKind::Encoding).with_message(text)
            }

            RunRecordError::InvalidConfig { .. } => {
                RrError::new(RrErrorKind::InvalidConfig).with_message(text)
            }

            RunRecordError::Io { op, path, message } => RrError::new(RrErrorKind::Io)
                .with_op(op)
                .with_path(path)
                .with_message(message),
        }
    }
}
