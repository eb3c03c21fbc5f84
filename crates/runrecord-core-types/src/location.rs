//! Source locations for authored snippets
//!
//! Every failure surfaced to the user names the document file and line the
//! offending snippet was declared at.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Position of a snippet inside its source document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    path: PathBuf,
    line: u32,
}

impl SourceLocation {
    pub fn new(path: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Document the snippet was declared in
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1-based line of the snippet declaration
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}
