//! PermCheck CLI
//!
//! Command-line interface for permission regression checks

use clap::{Parser, Subcommand, ValueEnum};
use permcheck_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "permcheck")]
#[command(about = "PermCheck - Detect regressions in declared app permissions", long_about = None)]
struct Cli {
    /// Emit structured logs on stderr
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check manifests against the permission baseline
    Check(commands::check::CheckArgs),
    /// Print the permissions and features a manifest declares
    Parse(commands::parse::ParseArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.log_format {
        Some(LogFormat::Pretty) => init(Profile::Development),
        Some(LogFormat::Json) => init(Profile::Production),
        None => {}
    }

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args),
        Commands::Parse(args) => commands::parse::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
