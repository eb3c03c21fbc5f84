//! Build configuration
//!
//! Loaded once per build from TOML:
//!
//! ```toml
//! basedir = "build/workdirs"
//! line_replace = [["/tmp/[a-z0-9]+", "/tmp/XXXX"]]
//!
//! [env]
//! PATH = "/usr/bin:/bin"
//! CAST_DIR = "build/casts"
//!
//! [languages.pycon]
//! output_encoding = "latin1"
//!
//! [languages.node]
//! command = ["node"]
//! ```
//!
//! `env` is the complete environment snippets run with (it replaces the
//! inherited environment when non-empty). Its `CAST_DIR` key also switches
//! cast recording on.

use crate::errors::{Result, RunRecordError};
use crate::language::{LanguageOverride, LanguageRegistry};
use crate::transform::ReplaceRule;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment key naming the cast directory
pub const CAST_DIR_KEY: &str = "CAST_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunRecordConfig {
    /// Base for snippet working directories
    pub basedir: Option<PathBuf>,
    /// Default environment for every snippet
    pub env: BTreeMap<String, String>,
    /// Global (pattern, replacement) rules, applied before snippet rules
    pub line_replace: Vec<(String, String)>,
    /// Registry overrides by language tag
    pub languages: BTreeMap<String, LanguageOverride>,
}

impl RunRecordConfig {
    /// Load from a TOML file
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, `InvalidConfig` when it does not
    /// parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).map_err(|e| RunRecordError::io("read_config", path, &e))?;
        Self::from_toml_str(&text).map_err(|err| match err {
            RunRecordError::InvalidConfig { reason } => RunRecordError::InvalidConfig {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })
    }

    /// Parse from TOML text
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on syntax errors or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RunRecordError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Make relative `basedir` and `CAST_DIR` relative to `dir`
    ///
    /// Used for configs loaded from a file, so paths mean the same thing
    /// regardless of the current directory.
    pub fn resolve_paths(mut self, dir: &Path) -> Self {
        if let Some(basedir) = self.basedir.take() {
            self.basedir = Some(dir.join(basedir));
        }
        if let Some(cast_dir) = self.env.get_mut(CAST_DIR_KEY) {
            if !cast_dir.is_empty() && Path::new(cast_dir.as_str()).is_relative() {
                *cast_dir = dir.join(cast_dir.as_str()).to_string_lossy().into_owned();
            }
        }
        self
    }

    /// Built-in languages merged with this config's overrides
    ///
    /// # Errors
    ///
    /// See [`LanguageRegistry::merged`].
    pub fn registry(&self) -> Result<LanguageRegistry> {
        LanguageRegistry::merged(&self.languages)
    }

    /// Compile the global replace rules, in order
    ///
    /// # Errors
    ///
    /// `InvalidPattern` for the first rule that does not compile.
    pub fn global_rules(&self) -> Result<Vec<ReplaceRule>> {
        self.line_replace
            .iter()
            .map(|(pattern, replacement)| ReplaceRule::new(pattern, replacement))
            .collect()
    }

    /// Cast directory, when cast recording is enabled
    pub fn cast_dir(&self) -> Option<PathBuf> {
        self.env
            .get(CAST_DIR_KEY)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }
}
