//! The `resume` command: retry tracks a previous run checkpointed.

use anyhow::Result;
use colored::Colorize;
use favsync_core::orchestrator::SyncSource;

use crate::config::AppConfig;
use crate::output;

pub async fn execute(config: AppConfig) -> Result<()> {
    let orchestrator = super::build_orchestrator(&config)?;

    if !orchestrator.checkpoint().has_pending().await {
        eprintln!("{}", "No pending checkpoint; nothing to resume".yellow());
        return Ok(());
    }

    let report = orchestrator.run(SyncSource::Checkpoint).await?;
    output::print_report(&report);
    Ok(())
}
