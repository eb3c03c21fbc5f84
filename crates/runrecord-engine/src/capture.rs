//! Capture cache
//!
//! A snippet's artifact path is its cache key. When the artifact exists the
//! snippet is not run and the file is left untouched; otherwise the snippet
//! is run once and its transformed output written.

use crate::build::BuildSettings;
use crate::exec::{execute, ProcessRunner};
use runrecord_core::extract::encoded_code;
use runrecord_core::transform::transform_output;
use runrecord_core::{log_op_end, log_op_error, log_op_start, SnippetRequest};
use runrecord_store::artifact::{artifact_exists, compose_artifact, write_artifact};
use runrecord_store::errors::io_error;
use runrecord_store::Result;
use std::collections::BTreeMap;
use std::fs;

/// What `ensure_captured` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Artifact already present; nothing ran
    Cached,
    /// Snippet ran and its artifact was written
    Captured { bytes: usize },
}

/// Build environment overlaid by the snippet's own variables
pub fn assemble_env(
    build_env: &BTreeMap<String, String>,
    overlay: &[(String, String)],
) -> Vec<(String, String)> {
    let mut env = build_env.clone();
    for (key, value) in overlay {
        env.insert(key.clone(), value.clone());
    }
    env.into_iter().collect()
}

/// Make sure `request`'s artifact exists, running the snippet if it does not
///
/// # Errors
///
/// Any failure resolving, running or transforming the snippet, or writing
/// its artifact. Errors carry the snippet's source location. No artifact is
/// written on failure.
pub fn ensure_captured<R: ProcessRunner + ?Sized>(
    settings: &BuildSettings,
    runner: &mut R,
    request: &SnippetRequest,
) -> Result<CaptureOutcome> {
    if artifact_exists(&request.artifact) {
        tracing::debug!(artifact = %request.artifact.display(), "artifact cached");
        return Ok(CaptureOutcome::Cached);
    }

    log_op_start!(
        "ensure_captured",
        language = request.language.as_str(),
        artifact = %request.artifact.display()
    );
    let start = std::time::Instant::now();

    let bytes = capture_impl(settings, runner, request).map_err(|e| {
        let e = e.with_location(request.source.clone());
        log_op_error!(
            "ensure_captured",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "ensure_captured",
        duration_ms = start.elapsed().as_millis() as u64,
        output_bytes = bytes
    );

    Ok(CaptureOutcome::Captured { bytes })
}

fn capture_impl<R: ProcessRunner + ?Sized>(
    settings: &BuildSettings,
    runner: &mut R,
    request: &SnippetRequest,
) -> Result<usize> {
    fs::create_dir_all(&request.workdir)
        .map_err(|e| io_error("create_workdir", &request.workdir, e))?;

    let entry = settings.registry.resolve(&request.language)?;
    let code = encoded_code(request, entry)?;
    let env = assemble_env(&settings.env, &request.env);

    let output = execute(
        runner,
        entry,
        &code,
        &request.workdir,
        &env,
        request.expected_exit_code,
        &request.source,
    )?;
    let output = transform_output(&output, &settings.global_rules, &request.replace_rules);

    write_artifact(&request.artifact, &compose_artifact(&request.content, &output))
}
