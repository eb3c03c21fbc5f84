//! Build context
//!
//! One `Build` spans a whole document-corpus build: it holds the frozen
//! settings, the process runner and the cast counter, and processes
//! snippets in document order. Any snippet failure aborts the document it
//! belongs to.

use crate::capture::{ensure_captured, CaptureOutcome};
use crate::cast::{record, SnippetCounter};
use crate::exec::ProcessRunner;
use crate::manifest::load_manifest;
use runrecord_core::errors::RrError;
use runrecord_core::{
    log_op_end, log_op_error, log_op_start, Layout, LanguageRegistry, ReplaceRule,
    RunRecordConfig, SnippetDirective, SnippetRequest, SourceLocation,
};
use runrecord_store::errors::io_error;
use runrecord_store::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Base working directory, relative to the document root, when the
/// configuration names none
pub const DEFAULT_BASEDIR: &str = ".runrecord/workdirs";

/// Immutable per-build settings
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub registry: LanguageRegistry,
    /// Applied to every snippet's output before its own rules
    pub global_rules: Vec<ReplaceRule>,
    /// Default environment for every snippet
    pub env: BTreeMap<String, String>,
    /// Cast recording is enabled when set
    pub cast_dir: Option<PathBuf>,
    pub layout: Layout,
}

impl BuildSettings {
    /// Built-in languages, no rules, inherited environment, no casts
    pub fn new(layout: Layout) -> Self {
        Self {
            registry: LanguageRegistry::builtin(),
            global_rules: Vec::new(),
            env: BTreeMap::new(),
            cast_dir: None,
            layout,
        }
    }

    /// Settings for documents under `doc_root`
    ///
    /// # Errors
    ///
    /// `InvalidConfig`, `Encoding` or `InvalidPattern` when the language
    /// overrides or global rules are invalid.
    pub fn from_config(config: &RunRecordConfig, doc_root: &Path) -> Result<Self> {
        let base_workdir = config
            .basedir
            .clone()
            .unwrap_or_else(|| doc_root.join(DEFAULT_BASEDIR));

        Ok(Self {
            registry: config.registry()?,
            global_rules: config.global_rules()?,
            env: config.env.clone(),
            cast_dir: config.cast_dir(),
            layout: Layout::new(doc_root, base_workdir),
        })
    }
}

/// Result of processing one snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetReport {
    pub source: SourceLocation,
    pub artifact: PathBuf,
    pub capture: CaptureOutcome,
    /// Cast snippet number, when the snippet was recorded
    pub cast_number: Option<u64>,
}

/// Context for one build
pub struct Build<R: ProcessRunner> {
    settings: BuildSettings,
    runner: R,
    counter: SnippetCounter,
}

impl<R: ProcessRunner> Build<R> {
    pub fn new(settings: BuildSettings, runner: R) -> Self {
        Self {
            settings,
            runner,
            counter: SnippetCounter::new(),
        }
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn counter(&self) -> &SnippetCounter {
        &self.counter
    }

    /// Capture `request` if needed, then record it into its cast
    ///
    /// # Errors
    ///
    /// The first failure of either step; the cast is not touched when the
    /// capture fails.
    pub fn process_snippet(&mut self, request: &SnippetRequest) -> Result<SnippetReport> {
        log_op_start!("process_snippet", source = %request.source);
        let start = std::time::Instant::now();

        let report = self.process_snippet_impl(request).map_err(|e| {
            log_op_error!(
                "process_snippet",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "process_snippet",
            duration_ms = start.elapsed().as_millis() as u64,
            cached = report.capture == CaptureOutcome::Cached
        );

        Ok(report)
    }

    fn process_snippet_impl(&mut self, request: &SnippetRequest) -> Result<SnippetReport> {
        let capture = ensure_captured(&self.settings, &mut self.runner, request)?;
        let cast_number = record(&self.settings, &mut self.counter, request)?;

        Ok(SnippetReport {
            source: request.source.clone(),
            artifact: request.artifact.clone(),
            capture,
            cast_number,
        })
    }

    /// Process the snippets of one document in order
    ///
    /// # Errors
    ///
    /// The first snippet failure; later snippets of the document are not
    /// processed.
    pub fn process_directives(
        &mut self,
        source: &Path,
        directives: &[SnippetDirective],
    ) -> Result<Vec<SnippetReport>> {
        let mut reports = Vec::with_capacity(directives.len());
        for directive in directives {
            let request = directive
                .to_request(source, &self.settings.layout)
                .map_err(|e| {
                    RrError::from(e).with_location(SourceLocation::new(
                        self.settings.layout.doc_root.join(source),
                        directive.line,
                    ))
                })?;
            reports.push(self.process_snippet(&request)?);
        }
        Ok(reports)
    }

    /// Load a manifest and process its snippets
    ///
    /// # Errors
    ///
    /// See [`load_manifest`] and [`Build::process_directives`].
    pub fn process_manifest(&mut self, manifest_path: &Path) -> Result<Vec<SnippetReport>> {
        let manifest_path = std::path::absolute(manifest_path)
            .map_err(|e| io_error("load_manifest", manifest_path, e))?;
        let manifest = load_manifest(&manifest_path)?;
        let source = manifest.source_path(&manifest_path);
        self.process_directives(&source, &manifest.snippet)
    }
}
