//! Durable checkpoint of not-yet-processed tracks

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;
use tokio::fs;

use crate::track::TrackReference;

/// Errors raised by the checkpoint store.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// No checkpoint file exists at the configured path.
    #[error("No checkpoint found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The checkpoint file could not be read.
    #[error("Failed to read checkpoint {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The checkpoint file could not be written or replaced.
    #[error("Failed to write checkpoint {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold a JSON array of track records.
    #[error("Malformed checkpoint {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The track list could not be encoded as JSON.
    #[error("Failed to encode checkpoint: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed store for the ordered list of tracks a run still owes.
///
/// Single writer, last writer wins: the orchestrator never writes
/// concurrently with itself and every save replaces the whole file. The
/// on-disk shape is a plain JSON array of `{title, artist}` records.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Create a store backed by the given file path. Nothing is touched on
    /// disk until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the checkpoint file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `items`, deduplicated by (title, artist) with the first
    /// occurrence keeping its position. The same track can arrive once from
    /// the in-memory failure buffer and again from the unprocessed tail of
    /// the working list.
    ///
    /// The write lands in a sibling temp file which is then renamed over the
    /// target, so a reader observes either the previous checkpoint or the
    /// new one, never a torn file.
    pub async fn save(&self, items: &[TrackReference]) -> Result<(), CheckpointError> {
        let unique = dedup_tracks(items);
        let json = serde_json::to_string_pretty(&unique)
            .map_err(|source| CheckpointError::Serialize { source })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| self.write_error(source))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, json.as_bytes())
            .await
            .map_err(|source| self.write_error(source))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.write_error(source))?;

        debug!(
            "Checkpointed {} track(s) to {}",
            unique.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Load the checkpointed track list in stored order.
    pub async fn load(&self) -> Result<Vec<TrackReference>, CheckpointError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(CheckpointError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(CheckpointError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&data).map_err(|source| CheckpointError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Remove the checkpoint. Idempotent: clearing an absent checkpoint is
    /// not an error.
    pub async fn clear(&self) -> Result<(), CheckpointError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Cleared checkpoint at {}", self.path.display());
                Ok(())
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.write_error(source)),
        }
    }

    /// Whether a non-trivial checkpoint file exists. A bare `[]` does not
    /// count; a prior run that finished clean leaves nothing behind.
    pub async fn has_pending(&self) -> bool {
        match fs::metadata(&self.path).await {
            Ok(meta) => meta.is_file() && meta.len() > 2,
            Err(_) => false,
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut raw = self.path.as_os_str().to_owned();
        raw.push(".tmp");
        PathBuf::from(raw)
    }

    fn write_error(&self, source: std::io::Error) -> CheckpointError {
        CheckpointError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// Drop repeated (title, artist) pairs, keeping first-occurrence order.
fn dedup_tracks(items: &[TrackReference]) -> Vec<TrackReference> {
    let mut seen: HashSet<&TrackReference> = HashSet::with_capacity(items.len());
    let mut unique = Vec::with_capacity(items.len());
    for track in items {
        if seen.insert(track) {
            unique.push(track.clone());
        }
    }
    unique
}
