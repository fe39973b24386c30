//! Shell completion scripts for `conso`

use std::io::Write;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::Cli;

#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    let mut stdout = std::io::stdout().lock();
    generate(args.shell, &mut cmd, bin_name, &mut stdout);
    stdout.flush()?;
    Ok(())
}
