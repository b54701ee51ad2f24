//! Mock playlist source serving a canned track list

use async_trait::async_trait;
use favsync_core::playlist::{PlaylistError, PlaylistSource};
use favsync_core::track::TrackReference;

/// Mock implementation of [`PlaylistSource`] returning a fixed list.
pub struct MockPlaylistSource {
    tracks: Vec<TrackReference>,
}

impl MockPlaylistSource {
    /// Create a source that serves `tracks` on every fetch.
    pub fn new(tracks: Vec<TrackReference>) -> Self {
        Self { tracks }
    }
}

#[async_trait]
impl PlaylistSource for MockPlaylistSource {
    async fn fetch(&self) -> Result<Vec<TrackReference>, PlaylistError> {
        Ok(self.tracks.clone())
    }
}
