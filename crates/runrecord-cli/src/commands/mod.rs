//! CLI subcommands

pub mod clean;
pub mod languages;
pub mod run;

use clap::Args;
use runrecord_core::RunRecordConfig;
use runrecord_engine::BuildSettings;
use std::path::{Path, PathBuf};

/// Options shared by commands that need the build configuration
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Build configuration (TOML); built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root of the document tree
    #[arg(long, default_value = ".")]
    pub doc_root: PathBuf,
}

impl ConfigArgs {
    /// Load the configuration, resolving its relative paths against the
    /// directory it lives in
    pub fn load_config(&self) -> Result<RunRecordConfig, Box<dyn std::error::Error>> {
        let Some(path) = &self.config else {
            return Ok(RunRecordConfig::default());
        };
        let path = std::path::absolute(path)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("/")).to_path_buf();
        Ok(RunRecordConfig::load(&path)?.resolve_paths(&dir))
    }

    /// Settings for one build over the document root
    pub fn build_settings(&self) -> Result<BuildSettings, Box<dyn std::error::Error>> {
        let config = self.load_config()?;
        let doc_root = std::path::absolute(&self.doc_root)?;
        Ok(BuildSettings::from_config(&config, &doc_root)?)
    }
}
