//! Check command: validate every table of a data directory

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use conso_core::{Strictness, Validator};

use crate::output::{render_outcome, OutputFormat};
use crate::Cli;

#[derive(Args)]
pub struct CheckArgs {
    /// Data directory (overrides --data-dir)
    pub dir: Option<PathBuf>,

    /// Stop at the first identifier or referential error
    #[arg(long)]
    pub fail_fast: bool,

    /// Treat completeness findings as errors
    #[arg(long)]
    pub blocking_completeness: bool,
}

pub fn run(args: &CheckArgs, cli: &Cli) -> anyhow::Result<ExitCode> {
    let dir = cli.data_dir(args.dir.as_ref());
    let mut config = crate::config::load(cli.config.as_deref(), &dir)?;
    if args.fail_fast {
        config = config.with_strictness(Strictness::FailFast);
    }
    if args.blocking_completeness {
        config = config.with_completeness_blocking(true);
    }

    tracing::info!(dir = %dir.display(), strictness = %config.strictness, "checking tables");
    let outcome = Validator::new(config).run(&dir)?;

    let format = OutputFormat::from(cli.format.as_str());
    let rendered = render_outcome(&outcome, format)?;
    if !cli.quiet || !outcome.is_success() || format == OutputFormat::Json {
        print!("{}", rendered);
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
