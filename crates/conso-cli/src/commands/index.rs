//! Index command: print the validated term index

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use conso_core::{IndexRecord, Validator};

use crate::output::OutputFormat;
use crate::Cli;

#[derive(Args)]
pub struct IndexArgs {
    /// Data directory (overrides --data-dir)
    pub dir: Option<PathBuf>,

    /// Print the index even when validation found errors
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &IndexArgs, cli: &Cli) -> anyhow::Result<ExitCode> {
    let dir = cli.data_dir(args.dir.as_ref());
    let config = crate::config::load(cli.config.as_deref(), &dir)?;
    let outcome = Validator::new(config).run(&dir)?;

    if !outcome.is_success() && !args.force {
        eprintln!(
            "Validation found {} error(s); run `conso check` for details or pass --force",
            outcome.error_count()
        );
        return Ok(ExitCode::FAILURE);
    }

    let Some(index) = outcome.index.as_ref() else {
        anyhow::bail!("Validation stopped before the term table was read");
    };
    let records = index.to_records();
    tracing::debug!(terms = records.len(), "exporting index");

    match OutputFormat::from(cli.format.as_str()) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Table => print!("{}", render_tsv(&records)),
    }
    Ok(ExitCode::SUCCESS)
}

fn render_tsv(records: &[IndexRecord]) -> String {
    let mut out = String::from("identifier\tname\tclass\n");
    for record in records {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            record.identifier, record.name, record.class
        ));
    }
    out
}
