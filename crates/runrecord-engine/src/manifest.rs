//! Snippet manifests
//!
//! A manifest stands in for one authored document: the snippets it
//! declares, in document order.
//!
//! ```toml
//! source = "guide/install.rst"
//!
//! [[snippet]]
//! line = 12
//! artifact = "captured/version.txt"
//! content = "$ python3 --version"
//! cast = "install"
//! ```

use runrecord_core::errors::{RrError, RrErrorKind};
use runrecord_core::SnippetDirective;
use runrecord_store::errors::io_error;
use runrecord_store::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnippetManifest {
    /// Document the snippets belong to, relative to the manifest's
    /// directory; defaults to the manifest's own path
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub snippet: Vec<SnippetDirective>,
}

impl SnippetManifest {
    /// Parse from TOML text
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the text is not a valid manifest.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            RrError::new(RrErrorKind::InvalidConfig)
                .with_op("load_manifest")
                .with_message(e.to_string())
        })
    }

    /// Source document for snippets loaded from `manifest_path`
    pub fn source_path(&self, manifest_path: &Path) -> PathBuf {
        match (&self.source, manifest_path.parent()) {
            (Some(source), Some(dir)) => dir.join(source),
            (Some(source), None) => source.clone(),
            (None, _) => manifest_path.to_path_buf(),
        }
    }
}

/// Load a manifest file
///
/// # Errors
///
/// `Io` when the file cannot be read, `InvalidConfig` when it does not
/// parse.
pub fn load_manifest(path: &Path) -> Result<SnippetManifest> {
    let text = fs::read_to_string(path).map_err(|e| io_error("load_manifest", path, e))?;
    let manifest = SnippetManifest::from_toml_str(&text).map_err(|e| e.with_path(path))?;
    tracing::debug!(
        path = %path.display(),
        snippets = manifest.snippet.len(),
        "manifest loaded"
    );
    Ok(manifest)
}
