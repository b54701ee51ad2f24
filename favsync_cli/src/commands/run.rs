//! The `run` command: sync a playlist into a fresh favorites collection.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;
use favsync_core::checkpoint::CheckpointStore;
use favsync_core::orchestrator::SyncSource;
use favsync_core::playlist::{JsonPlaylist, PlaylistSource};
use favsync_core::track::TrackReference;

use crate::config::AppConfig;
use crate::output;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Playlist file to sync (JSON array of {title, artist} records)
    pub playlist: Option<PathBuf>,

    /// Name for the created collection (defaults to a timestamp)
    #[arg(short = 'n', long)]
    pub collection_name: Option<String>,

    /// Skip tracks until one whose title contains this text
    #[arg(long, value_name = "TITLE")]
    pub start_from: Option<String>,

    /// Throw away a pending checkpoint instead of refusing to start
    #[arg(long)]
    pub discard_checkpoint: bool,
}

pub async fn execute(args: RunArgs, mut config: AppConfig) -> Result<()> {
    let playlist_path = match args.playlist.or_else(|| config.paths.playlist.clone()) {
        Some(path) => path,
        None => bail!("No playlist given; pass one or set paths.playlist in the config"),
    };

    if args.collection_name.is_some() {
        config.collection.name = args.collection_name;
    }

    let store = CheckpointStore::new(config.paths.checkpoint.clone());
    if store.has_pending().await {
        if args.discard_checkpoint {
            store
                .clear()
                .await
                .context("Failed to discard the pending checkpoint")?;
            eprintln!("{}", "Discarded a pending checkpoint".yellow());
        } else {
            bail!(
                "A previous run left unresolved tracks behind; run `favsync resume` to \
                 finish them first, or pass --discard-checkpoint to drop them"
            );
        }
    }

    let source = JsonPlaylist::new(&playlist_path);
    let mut tracks = source
        .fetch()
        .await
        .with_context(|| format!("Failed to load playlist {}", playlist_path.display()))?;

    if let Some(needle) = &args.start_from {
        tracks = skip_until(tracks, needle)?;
    }

    eprintln!("Syncing {} track(s) from {}", tracks.len(), playlist_path.display());

    let orchestrator = super::build_orchestrator(&config)?;
    let report = orchestrator.run(SyncSource::Fresh(tracks)).await?;
    output::print_report(&report);
    Ok(())
}

/// Drop leading tracks until one whose title contains `needle`,
/// case-insensitively. That track itself is kept.
fn skip_until(tracks: Vec<TrackReference>, needle: &str) -> Result<Vec<TrackReference>> {
    let lowered = needle.to_lowercase();
    let position = tracks
        .iter()
        .position(|track| track.title.to_lowercase().contains(&lowered));

    match position {
        Some(index) => Ok(tracks.into_iter().skip(index).collect()),
        None => bail!("No track title contains \"{needle}\""),
    }
}
