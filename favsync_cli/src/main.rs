use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use favsync_cli::commands;
use favsync_cli::config::get_config;

#[derive(Parser)]
#[command(name = "favsync")]
#[command(author, version, about = "Favorites Sync - Migrate playlist tracks into a video platform favorites collection", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Use a specific config file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync a playlist into a fresh favorites collection
    Run(commands::run::RunArgs),

    /// Retry tracks a previous run left unresolved
    Resume,

    /// Show checkpointed tracks waiting for a retry
    Status,

    /// Drop the pending checkpoint without replaying it
    Clear,

    /// Inspect or scaffold the configuration
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("favsync_core", log::LevelFilter::Debug)
            .filter_module("favsync_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config_path = cli.config.clone();
    let load = || get_config(config_path.as_deref()).context("Failed to load configuration");

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, load()?).await?,
        Commands::Resume => commands::resume::execute(load()?).await?,
        Commands::Status => commands::status::execute(load()?).await?,
        Commands::Clear => commands::clear::execute(load()?).await?,
        Commands::Config { command } => {
            commands::config::execute(command, config_path.as_deref())?
        }
        Commands::Completions { shell } => generate_completions(shell),
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
