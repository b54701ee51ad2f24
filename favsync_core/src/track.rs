//! Track and search candidate data types

use std::fmt;

use serde::{Deserialize, Serialize};

/// A (title, artist) pair identifying a song to locate on the video platform.
///
/// Equality and hashing cover the full pair; checkpoint deduplication and the
/// processed/remaining bookkeeping both rely on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackReference {
    /// Track title. Playlist exports sometimes label this field `name`.
    #[serde(alias = "name")]
    pub title: String,
    /// Primary artist as exported by the playlist source.
    pub artist: String,
}

impl TrackReference {
    /// Create a track reference from owned or borrowed strings.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Search keyword sent to the video platform for this track.
    pub fn query(&self) -> String {
        format!("{} {}", self.title, self.artist)
    }
}

impl fmt::Display for TrackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

/// Numeric platform identifier for a single video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoId(pub u64);

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One search result returned by the platform for a query.
///
/// Produced transiently per search; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    /// Platform identifier used for the favorite-add call.
    pub id: VideoId,
    /// Result title with platform markup already stripped.
    pub title: String,
    /// Video length in whole seconds, 0 when the platform sent garbage.
    pub duration_secs: u32,
}

impl SearchCandidate {
    /// Create a candidate, mostly useful in tests and service adapters.
    pub fn new(id: u64, title: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            id: VideoId(id),
            title: title.into(),
            duration_secs,
        }
    }
}

/// Parse a colon-separated duration string into whole seconds.
///
/// Accepts the `"SS"`, `"M:SS"` and `"H:MM:SS"` shapes the platform emits.
/// Any component that is not a plain non-negative integer yields 0, which can
/// never pass the duration window, so a track with garbled metadata is skipped
/// rather than favorited on bad data. Never panics; arithmetic saturates.
pub fn parse_duration(raw: &str) -> u32 {
    let mut total: u32 = 0;
    for part in raw.split(':') {
        match part.trim().parse::<u32>() {
            Ok(value) => total = total.saturating_mul(60).saturating_add(value),
            Err(_) => return 0,
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_duration_known_vectors() {
        let cases = [
            ("0:30", 30),
            ("3:25", 205),
            ("10:00", 600),
            ("1:02:03", 3723),
            ("205", 205),
            ("0:0", 0),
        ];

        for (input, expected) in cases {
            assert_eq!(parse_duration(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_parse_duration_rejects_non_numeric_components() {
        for input in ["", "abc", "3:x5", "-1:30", "1:2:3:4x", "::", "3.5"] {
            assert_eq!(parse_duration(input), 0, "input: {input:?}");
        }
    }

    #[test]
    fn test_parse_duration_tolerates_surrounding_whitespace() {
        assert_eq!(parse_duration(" 3:25"), 205);
        assert_eq!(parse_duration("3 : 25"), 205);
    }

    #[test]
    fn test_parse_duration_saturates_instead_of_overflowing() {
        let huge = format!("{}:00", u32::MAX);
        assert_eq!(parse_duration(&huge), u32::MAX);
    }

    #[test]
    fn test_query_joins_title_and_artist() {
        let track = TrackReference::new("Blue Bird", "Ikimonogakari");
        assert_eq!(track.query(), "Blue Bird Ikimonogakari");
    }

    #[test]
    fn test_track_equality_is_by_pair() {
        let a = TrackReference::new("Song", "Artist");
        let b = TrackReference::new("Song", "Artist");
        let c = TrackReference::new("Song", "Other Artist");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_track_deserializes_name_alias() {
        let track: TrackReference =
            serde_json::from_str(r#"{"name": "Song", "artist": "Artist"}"#).unwrap();
        assert_eq!(track.title, "Song");
        assert_eq!(track.artist, "Artist");
    }

    #[test]
    fn test_track_serializes_with_title_field() {
        let json = serde_json::to_string(&TrackReference::new("Song", "Artist")).unwrap();
        assert!(json.contains("\"title\""));
        assert!(!json.contains("\"name\""));
    }

    proptest! {
        #[test]
        fn test_parse_duration_never_panics(raw: String) {
            let _ = parse_duration(&raw);
        }
    }

    proptest! {
        #[test]
        fn test_parse_duration_minute_second_formula(minutes in 0u32..6000, seconds in 0u32..60) {
            let raw = format!("{minutes}:{seconds:02}");
            prop_assert_eq!(parse_duration(&raw), minutes * 60 + seconds);
        }
    }

    proptest! {
        #[test]
        fn test_parse_duration_zero_on_alphabetic_input(raw in "[0-9:]*[a-z]+[0-9:]*") {
            prop_assert_eq!(parse_duration(&raw), 0);
        }
    }
}
