//! Clean command
//!
//! Usage: runrecord clean [--config <FILE>] [--doc-root <DIR>] [--artifacts <MANIFEST>...]
//!
//! Run before a from-scratch build; cast files are append-only and would
//! otherwise collect a second copy of every entry.

use crate::commands::ConfigArgs;
use clap::Args;
use runrecord_engine::load_manifest;
use runrecord_store::clean::{clean_artifacts, clean_cast_dir};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Also delete the artifacts declared by these manifests
    #[arg(long, num_args = 1..)]
    pub artifacts: Vec<PathBuf>,
}

/// Execute clean command
pub fn execute(args: CleanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = args.config.build_settings()?;

    match &settings.cast_dir {
        Some(cast_dir) => {
            let removed = clean_cast_dir(cast_dir)?;
            println!("removed {} cast entries from {}", removed, cast_dir.display());
        }
        None => println!("no CAST_DIR configured; no casts to clean"),
    }

    let mut artifacts = Vec::new();
    for manifest_path in &args.artifacts {
        let manifest_path = std::path::absolute(manifest_path)?;
        let manifest = load_manifest(&manifest_path)?;
        let source = manifest.source_path(&manifest_path);
        for directive in &manifest.snippet {
            artifacts.push(directive.to_request(&source, &settings.layout)?.artifact);
        }
    }
    if !args.artifacts.is_empty() {
        let removed = clean_artifacts(artifacts.iter().map(PathBuf::as_path))?;
        println!("removed {} artifacts", removed);
    }

    Ok(())
}
