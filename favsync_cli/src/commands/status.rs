//! The `status` command: show what a previous run left unresolved.

use anyhow::{Context, Result};
use colored::Colorize;
use favsync_core::checkpoint::CheckpointStore;

use crate::config::AppConfig;
use crate::output;

pub async fn execute(config: AppConfig) -> Result<()> {
    let store = CheckpointStore::new(config.paths.checkpoint.clone());

    if !store.has_pending().await {
        println!("{}", "No pending tracks".green());
        return Ok(());
    }

    let tracks = store
        .load()
        .await
        .context("Failed to read the pending checkpoint")?;
    print!("{}", output::format_pending(&tracks, store.path()));
    Ok(())
}
