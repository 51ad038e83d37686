use anyhow::{Context, Result};
use clap::{error::ErrorKind, Parser, Subcommand};
use std::path::PathBuf;

mod anchors;
mod checker;
mod commands;
mod config;
mod diagnostics;
mod exit_codes;
mod fix;
mod output;
mod reason_codes;
mod report;
mod resolve;
mod shim;
mod vcs;

use config::Config;
use output::{JsonError, Output};

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "tsmend")]
#[command(version = VERSION)]
#[command(about = "Mechanical remediation for type-check diagnostics", long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Path to config file (default: ./tsmend.toml)
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// Project root (overrides [project] root in tsmend.toml)
    #[arg(long = "root", global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Minimal output (errors only)
    #[arg(long, global = true)]
    quiet: bool,

    /// Show per-stage detail
    #[arg(long, global = true)]
    verbose: bool,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full remediation pipeline (guard, check, fix, re-check)
    Run {
        /// Directory for run artifacts (created if absent)
        out_dir: PathBuf,
        /// Compute and report the fix plan without modifying any file
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove remaining stale suppressions recorded by a prior run
    Sweep {
        /// Artifact directory of the prior `tsmend run`
        out_dir: PathBuf,
    },
    /// Repair missing imports in a single file
    Imports {
        /// File to repair
        file: PathBuf,
    },
}

fn main() {
    // Check for --json flag early (before full parsing) for error handling
    let json_mode = std::env::args().any(|arg| arg == "--json");

    // Use try_parse to handle clap errors in JSON mode
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if json_mode {
                match e.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                        print!("{}", e);
                        std::process::exit(exit_codes::OK);
                    }
                    _ => {
                        JsonError::new(e.to_string()).print();
                        std::process::exit(exit_codes::USAGE);
                    }
                }
            } else {
                // Human mode: let clap print its formatted output
                e.exit();
            }
        }
    };

    let output = Output::new(cli.json, cli.quiet, cli.verbose);

    match run(cli, &output) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            if json_mode {
                // JSON mode: structured error to stdout with full chain
                let full_chain = format!("{e:#}");
                JsonError::with_details(e.to_string(), full_chain).print();
            } else {
                // Human mode: error to stderr with full chain
                eprintln!("Error: {e:#}");
            }
            std::process::exit(exit_codes::OPERATIONAL_FAILURE);
        }
    }
}

fn run(cli: Cli, output: &Output) -> Result<i32> {
    let config =
        Config::load(cli.config_path.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Run { out_dir, dry_run } => {
            commands::run(&out_dir, &config, cli.root.as_deref(), dry_run, output)
        }
        Commands::Sweep { out_dir } => {
            commands::sweep(&out_dir, &config, cli.root.as_deref(), output)
        }
        Commands::Imports { file } => commands::imports(&file, &config, output),
    }
}
