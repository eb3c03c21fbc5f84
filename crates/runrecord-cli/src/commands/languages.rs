//! Languages command
//!
//! Usage: runrecord languages [--config <FILE>] [--json]

use crate::commands::ConfigArgs;
use clap::Args;
use runrecord_core::LanguageEntry;

#[derive(Debug, Args)]
pub struct LanguagesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

fn entry_json(entry: &LanguageEntry) -> serde_json::Value {
    serde_json::json!({
        "tag": entry.tag(),
        "command": entry.command(),
        "prompt_prefix": entry.prompt_prefix(),
        "input_encoding": entry.input_encoding(),
        "output_encoding": entry.output_encoding(),
    })
}

/// Execute languages command
pub fn execute(args: LanguagesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = args.config.load_config()?.registry()?;

    if args.json {
        let entries: Vec<_> = registry.entries().map(entry_json).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in registry.entries() {
        println!(
            "{}\t{}\tprompt={:?}\tin={}\tout={}",
            entry.tag(),
            entry.command().join(" "),
            entry.prompt_prefix(),
            entry.input_encoding(),
            entry.output_encoding()
        );
    }

    Ok(())
}
