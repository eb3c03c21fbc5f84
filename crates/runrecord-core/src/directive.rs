//! Inbound snippet directives
//!
//! A `SnippetDirective` holds the options a document declares for one
//! snippet, still in their authored string form. Converting it into a
//! [`SnippetRequest`] resolves paths against the build [`Layout`] and parses
//! the environment and replace-rule mini syntaxes.

use crate::errors::{Result, RunRecordError};
use crate::language::DEFAULT_LANGUAGE;
use crate::request::SnippetRequest;
use crate::transform::parse_replace_rules;
use runrecord_core_types::SourceLocation;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory layout a build resolves snippet paths against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Root of the document tree
    pub doc_root: PathBuf,
    /// Root under which snippet working directories are created
    pub base_workdir: PathBuf,
}

impl Layout {
    pub fn new(doc_root: impl Into<PathBuf>, base_workdir: impl Into<PathBuf>) -> Self {
        Self {
            doc_root: doc_root.into(),
            base_workdir: base_workdir.into(),
        }
    }

    /// Default working directory for snippets of `source`
    ///
    /// Mirrors the source's position in the document tree: `a/b.rst` runs in
    /// `<base>/a/b`.
    pub fn default_workdir(&self, source: &Path) -> Result<PathBuf> {
        let relative = self.relative_source(source)?;
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        let stem = relative
            .file_stem()
            .ok_or_else(|| RunRecordError::InvalidConfig {
                reason: format!("source path {} has no file name", source.display()),
            })?;
        Ok(self.base_workdir.join(parent).join(stem))
    }

    fn relative_source(&self, source: &Path) -> Result<PathBuf> {
        if source.is_relative() {
            return Ok(source.to_path_buf());
        }
        source
            .strip_prefix(&self.doc_root)
            .map(Path::to_path_buf)
            .map_err(|_| RunRecordError::InvalidConfig {
                reason: format!(
                    "source {} is outside the document root {}",
                    source.display(),
                    self.doc_root.display()
                ),
            })
    }
}

/// Options of one authored snippet
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnippetDirective {
    /// Line the snippet is declared at; 0 when unknown
    #[serde(default)]
    pub line: u32,
    /// Output artifact, relative to the source file's directory
    pub artifact: PathBuf,
    /// Authored content, prompts included
    #[serde(default)]
    pub content: String,
    pub language: Option<String>,
    pub realcommand: Option<String>,
    pub exitcode: Option<i32>,
    /// Working directory relative to the base working directory
    pub workdir: Option<PathBuf>,
    /// `KEY=VALUE` lines
    pub env: Option<String>,
    /// Replace rules in `<d>pattern<d>replacement<d>` form, one per line
    pub linereplace: Option<String>,
    pub cast: Option<String>,
    pub notes: Option<String>,
}

impl SnippetDirective {
    /// Resolve into a request for a snippet authored in `source`
    ///
    /// `source` is relative to the layout's document root, or absolute
    /// inside it. Errors carry no location; callers attach it.
    pub fn to_request(&self, source: &Path, layout: &Layout) -> Result<SnippetRequest> {
        let absolute_source = layout.doc_root.join(source);
        let source_dir = absolute_source.parent().unwrap_or_else(|| Path::new(""));

        let workdir = match &self.workdir {
            Some(dir) => layout.base_workdir.join(dir),
            None => layout.default_workdir(source)?,
        };

        let mut request = SnippetRequest::new(
            SourceLocation::new(absolute_source.clone(), self.line),
            self.content.lines().map(str::to_string).collect(),
            source_dir.join(&self.artifact),
            workdir,
        );
        request.language = self
            .language
            .clone()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        request.literal_command = self.realcommand.clone();
        request.expected_exit_code = self.exitcode.unwrap_or(0);
        request.env = match &self.env {
            Some(lines) => parse_env_lines(lines)?,
            None => Vec::new(),
        };
        request.replace_rules = match &self.linereplace {
            Some(lines) => parse_replace_rules(lines)?,
            None => Vec::new(),
        };
        request.cast = self.cast.clone().filter(|tag| !tag.trim().is_empty());
        request.notes = self.notes.clone();

        Ok(request)
    }
}

/// Parse `KEY=VALUE` lines, splitting on the first `=`
///
/// Blank lines are skipped; values may themselves contain `=`.
pub fn parse_env_lines(text: &str) -> Result<Vec<(String, String)>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| RunRecordError::MalformedEnvLine {
                    line: line.to_string(),
                })
        })
        .collect()
}
