//! Playlist sources supplying the ordered track list

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use thiserror::Error;
use tokio::fs;

use crate::track::TrackReference;

/// Errors raised while loading a playlist.
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// The playlist file could not be read.
    #[error("Failed to read playlist {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold a JSON array of track records.
    #[error("Malformed playlist {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything able to produce the ordered list of tracks to sync.
///
/// Building that list may involve operator steps (logins, manual exports)
/// that are invisible here; the sync pipeline only consumes the final
/// ordering.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Fetch the full track list in playlist order.
    async fn fetch(&self) -> Result<Vec<TrackReference>, PlaylistError>;
}

/// Playlist cached on disk as a JSON array of `{title, artist}` records,
/// the shape playlist exporters write. `name` is accepted as an alias for
/// `title`.
#[derive(Debug, Clone)]
pub struct JsonPlaylist {
    path: PathBuf,
}

impl JsonPlaylist {
    /// Create a source reading from the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the playlist file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PlaylistSource for JsonPlaylist {
    async fn fetch(&self) -> Result<Vec<TrackReference>, PlaylistError> {
        let data = fs::read_to_string(&self.path)
            .await
            .map_err(|source| PlaylistError::Read {
                path: self.path.clone(),
                source,
            })?;

        let tracks: Vec<TrackReference> =
            serde_json::from_str(&data).map_err(|source| PlaylistError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        debug!("Loaded {} track(s) from {}", tracks.len(), self.path.display());
        Ok(tracks)
    }
}
