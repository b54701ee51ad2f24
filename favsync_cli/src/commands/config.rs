//! The `config` command: inspect and scaffold the configuration file.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::Colorize;

use crate::config::{AppConfig, ConfigManager};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the configuration file path
    Path,

    /// Write a config file populated with the defaults
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

pub fn execute(command: ConfigCommand, config_path: Option<&Path>) -> Result<()> {
    let manager = match config_path {
        Some(path) => ConfigManager::with_path(path.to_path_buf()),
        None => ConfigManager::new(),
    };

    match command {
        ConfigCommand::Show => {
            let config = manager.load()?;
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render the configuration")?;
            print!("{rendered}");
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
        ConfigCommand::Init { force } => {
            let path = manager.get_config_path();
            if path.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }

            let rendered = toml::to_string_pretty(&AppConfig::default())
                .context("Failed to render the default configuration")?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }

    Ok(())
}
