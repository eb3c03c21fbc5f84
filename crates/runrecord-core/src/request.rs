//! Snippet requests
//!
//! A `SnippetRequest` is the fully resolved, typed form of one discovered
//! snippet. It lives for the duration of one build step and is never
//! persisted.

use crate::language::DEFAULT_LANGUAGE;
use crate::transform::ReplaceRule;
use runrecord_core_types::SourceLocation;
use std::path::PathBuf;

/// One snippet to capture and, optionally, record into a cast
#[derive(Debug, Clone)]
pub struct SnippetRequest {
    /// Where the snippet was authored
    pub source: SourceLocation,
    /// Language tag resolved against the registry
    pub language: String,
    /// Authored lines, prompts included
    pub content: Vec<String>,
    /// Code to run and record instead of the prompt-stripped content
    pub literal_command: Option<String>,
    pub expected_exit_code: i32,
    /// Overlay on the build environment, applied in order
    pub env: Vec<(String, String)>,
    /// Applied after the build's global rules
    pub replace_rules: Vec<ReplaceRule>,
    /// Output artifact; its existence is the cache key
    pub artifact: PathBuf,
    pub workdir: PathBuf,
    pub cast: Option<String>,
    pub notes: Option<String>,
}

impl SnippetRequest {
    /// Request with default options: console language, exit code 0, no
    /// overlays, no cast
    pub fn new(
        source: SourceLocation,
        content: Vec<String>,
        artifact: impl Into<PathBuf>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            language: DEFAULT_LANGUAGE.to_string(),
            content,
            literal_command: None,
            expected_exit_code: 0,
            env: Vec::new(),
            replace_rules: Vec::new(),
            artifact: artifact.into(),
            workdir: workdir.into(),
            cast: None,
            notes: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_literal_command(mut self, command: impl Into<String>) -> Self {
        self.literal_command = Some(command.into());
        self
    }

    pub fn with_expected_exit_code(mut self, code: i32) -> Self {
        self.expected_exit_code = code;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_replace_rules(mut self, rules: Vec<ReplaceRule>) -> Self {
        self.replace_rules = rules;
        self
    }

    pub fn with_cast(mut self, tag: impl Into<String>) -> Self {
        self.cast = Some(tag.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
