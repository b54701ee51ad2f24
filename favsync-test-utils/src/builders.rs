//! Test data builders for sync scenarios

use favsync_core::track::{SearchCandidate, TrackReference};

/// Single track reference.
pub fn track(title: &str, artist: &str) -> TrackReference {
    TrackReference::new(title, artist)
}

/// Track references from (title, artist) pairs, keeping order.
pub fn tracks(pairs: &[(&str, &str)]) -> Vec<TrackReference> {
    pairs
        .iter()
        .map(|(title, artist)| TrackReference::new(*title, *artist))
        .collect()
}

/// Search candidate with an explicit duration.
pub fn candidate(id: u64, title: &str, duration_secs: u32) -> SearchCandidate {
    SearchCandidate::new(id, title, duration_secs)
}

/// Candidate shaped like a full song, inside the default duration window.
pub fn song(id: u64) -> SearchCandidate {
    candidate(id, "full song upload", 205)
}

/// Candidate shaped like a short clip, outside the default duration window.
pub fn clip(id: u64) -> SearchCandidate {
    candidate(id, "short clip", 42)
}
