//! CLI command implementations

pub mod clear;
pub mod config;
pub mod resume;
pub mod run;
pub mod status;

use anyhow::{Context, Result};
use favsync_core::checkpoint::CheckpointStore;
use favsync_core::orchestrator::SyncOrchestrator;
use favsync_core::service::BilibiliClient;

use crate::config::{AppConfig, load_credential};

/// Assemble an orchestrator from the loaded configuration.
fn build_orchestrator(config: &AppConfig) -> Result<SyncOrchestrator<BilibiliClient>> {
    let credential = load_credential(&config.paths.credentials)?;
    let client = BilibiliClient::new(&credential, &config.service_config())
        .context("Failed to build the platform client")?;
    let store = CheckpointStore::new(config.paths.checkpoint.clone());
    Ok(SyncOrchestrator::new(client, store, config.sync_config()))
}
