//! Cast recorder
//!
//! Appends tagged snippets to their cast script and listing. Numbering is
//! shared by every cast in a build, so the counter is owned by the build and
//! passed in by `&mut`.

use crate::build::BuildSettings;
use runrecord_core::extract::extract_code;
use runrecord_core::{log_op_end, log_op_error, log_op_start, SnippetRequest};
use runrecord_store::cast_files::{
    append_cast, append_listing, default_announcement, ensure_cast_dir, CastPaths,
};
use runrecord_store::Result;
use std::path::Path;

/// Build-wide snippet numbering, starting at 1
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetCounter {
    last: u64,
}

impl SnippetCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next number
    pub fn next_number(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Last number handed out; 0 before the first
    pub fn current(&self) -> u64 {
        self.last
    }
}

/// Record `request` into its cast, if it has one
///
/// Returns the snippet number used, or `None` when the request has no cast
/// tag or the build has no cast directory. In both of those cases nothing
/// is written and the counter is left alone. The recorded code is the
/// extracted code, whether or not the capture step ran the snippet.
///
/// # Errors
///
/// `UnknownLanguage` for an unregistered language, `Io` when the cast
/// directory or files cannot be written.
pub fn record(
    settings: &BuildSettings,
    counter: &mut SnippetCounter,
    request: &SnippetRequest,
) -> Result<Option<u64>> {
    let (Some(tag), Some(cast_dir)) = (request.cast.as_deref(), settings.cast_dir.as_deref())
    else {
        return Ok(None);
    };

    log_op_start!("record_cast", cast = tag, source = %request.source);
    let start = std::time::Instant::now();

    let number = record_impl(settings, counter, request, tag, cast_dir).map_err(|e| {
        let e = e.with_location(request.source.clone());
        log_op_error!(
            "record_cast",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "record_cast",
        duration_ms = start.elapsed().as_millis() as u64,
        snippet_number = number
    );

    Ok(Some(number))
}

fn record_impl(
    settings: &BuildSettings,
    counter: &mut SnippetCounter,
    request: &SnippetRequest,
    tag: &str,
    cast_dir: &Path,
) -> Result<u64> {
    let entry = settings.registry.resolve(&request.language)?;
    let code = extract_code(request, entry);

    ensure_cast_dir(cast_dir)?;
    let number = counter.next_number();
    let paths = CastPaths::new(cast_dir, tag);

    let announcement = request
        .notes
        .clone()
        .unwrap_or_else(|| default_announcement(number));

    append_cast(&paths.script, &announcement, &code, number)?;
    append_listing(&paths, number, &code)?;

    Ok(number)
}
