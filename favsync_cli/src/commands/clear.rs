//! The `clear` command: drop a pending checkpoint without replaying it.

use anyhow::{Context, Result};
use colored::Colorize;
use favsync_core::checkpoint::CheckpointStore;

use crate::config::AppConfig;

pub async fn execute(config: AppConfig) -> Result<()> {
    let store = CheckpointStore::new(config.paths.checkpoint.clone());

    if !store.has_pending().await {
        eprintln!("No pending checkpoint");
        return Ok(());
    }

    store
        .clear()
        .await
        .context("Failed to clear the checkpoint")?;
    println!("{}", "Checkpoint cleared".green());
    Ok(())
}
