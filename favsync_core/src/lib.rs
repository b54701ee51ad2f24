//! Favorites Sync Core Library
//!
//! Core library for migrating a playlist of track references into a video
//! platform favorites collection, covering search, duration-based matching,
//! rate limit handling, and checkpoint persistence.

pub mod checkpoint;
pub mod error;
pub mod matcher;
pub mod orchestrator;
pub mod playlist;
pub mod ratelimit;
pub mod service;
pub mod track;

// Re-export main types
pub use checkpoint::{CheckpointError, CheckpointStore};
pub use error::{Error, Result};
pub use matcher::{DEFAULT_MAX_DURATION_SECS, DEFAULT_MIN_DURATION_SECS, DurationMatcher};
pub use orchestrator::{
    DEFAULT_COOLDOWN, DEFAULT_SEARCH_DELAY, RunOutcome, RunReport, SyncConfig, SyncOrchestrator,
    SyncSource, TransportErrorPolicy,
};
pub use playlist::{JsonPlaylist, PlaylistError, PlaylistSource};
pub use ratelimit::{
    DEFAULT_NOT_FOUND_THRESHOLD, Observation, RATE_LIMIT_STATUS, RateLimitDetector, Signal,
};
pub use service::{
    BilibiliClient, BilibiliConfig, CollectionId, Credential, ServiceError, VideoService,
    Visibility,
};
pub use track::{SearchCandidate, TrackReference, VideoId, parse_duration};
