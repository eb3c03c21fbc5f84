//! runrecord CLI
//!
//! Command-line interface for capturing snippet output and recording casts

use clap::{Parser, Subcommand};
use runrecord_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "runrecord")]
#[command(about = "runrecord - Capture command output and record replay casts", long_about = None)]
struct Cli {
    /// Human-readable debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON logs on stderr
    #[arg(long, global = true, conflicts_with = "verbose")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Capture snippets from manifests and record their casts
    Run(commands::run::RunArgs),
    /// Delete cast files, and optionally captured artifacts
    Clean(commands::clean::CleanArgs),
    /// Show the merged language registry
    Languages(commands::languages::LanguagesArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.json_logs {
        init(Profile::Production);
    } else if cli.verbose || std::env::var_os("RUST_LOG").is_some() {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Clean(args) => commands::clean::execute(args),
        Commands::Languages(args) => commands::languages::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
