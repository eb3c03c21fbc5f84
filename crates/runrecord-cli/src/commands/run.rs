//! Run command
//!
//! Usage: runrecord run [--config <FILE>] [--doc-root <DIR>] <MANIFEST>...

use crate::commands::ConfigArgs;
use clap::Args;
use runrecord_engine::{Build, CaptureOutcome, SnippetReport, SystemRunner};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Snippet manifests, processed in order
    #[arg(required = true)]
    pub manifests: Vec<PathBuf>,
}

/// One output line per processed snippet
pub fn report_line(report: &SnippetReport) -> String {
    let mut line = match report.capture {
        CaptureOutcome::Cached => format!("cached   {}", report.artifact.display()),
        CaptureOutcome::Captured { bytes } => {
            format!("captured {} ({} bytes)", report.artifact.display(), bytes)
        }
    };
    if let Some(number) = report.cast_number {
        line.push_str(&format!(" cast #{}", number));
    }
    line
}

/// Execute run command
pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = args.config.build_settings()?;
    let mut build = Build::new(settings, SystemRunner);

    for manifest in &args.manifests {
        let manifest = std::path::absolute(manifest)?;
        for report in build.process_manifest(&manifest)? {
            println!("{}", report_line(&report));
        }
    }

    Ok(())
}
