//! CONSO CLI - Command line interface for the terminology validator

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{check, completions, index};

#[derive(Parser)]
#[command(name = "conso")]
#[command(author, version, about = "Validate the CONSO curated terminology tables")]
pub struct Cli {
    /// Directory holding the tables (default: current directory)
    #[arg(short, long, global = true, env = "CONSO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (default: conso.toml in the data directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Data directory, preferring a positional path given to the subcommand
    pub fn data_dir(&self, positional: Option<&PathBuf>) -> PathBuf {
        positional
            .or(self.data_dir.as_ref())
            .cloned()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the tables and report every problem found
    Check(check::CheckArgs),
    /// Validate, then print the term index for exporters
    Index(index::IndexArgs),
    /// Manage the configuration file
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting conso CLI");

    match &cli.command {
        Commands::Check(args) => check::run(args, &cli),
        Commands::Index(args) => index::run(args, &cli),
        Commands::Config(args) => commands::config::run(args, &cli).map(|()| ExitCode::SUCCESS),
        Commands::Completions(args) => completions::run(args).map(|()| ExitCode::SUCCESS),
    }
}
