//! Config command for inspecting and creating `conso.toml`

use std::path::PathBuf;

use clap::{Args, Subcommand};
use conso_core::ValidationConfig;

use crate::config::{config_file_path, save, CONFIG_FILE_NAME};
use crate::Cli;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show which config file would be used
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Write a config file with every default spelled out
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs, cli: &Cli) -> anyhow::Result<()> {
    let dir = cli.data_dir(None);
    match &args.command {
        ConfigCommands::Path => {
            match config_file_path(cli.config.as_deref(), &dir) {
                Some(path) => println!("{}", path.display()),
                None => println!("(none, using built-in defaults)"),
            }
            Ok(())
        }
        ConfigCommands::Show => {
            let config = crate::config::load(cli.config.as_deref(), &dir)?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(|| dir.join(CONFIG_FILE_NAME));
            run_init(path, *force)
        }
    }
}

fn run_init(path: PathBuf, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    save(&ValidationConfig::default(), &path)?;
    println!("Created config file at {}", path.display());
    Ok(())
}
