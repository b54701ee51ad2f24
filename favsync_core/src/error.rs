//! Error types for the favorites sync library
//!
//! Each subsystem defines its own error enum; this module aggregates them
//! into the single [`Error`] type that orchestrator entry points return.

use thiserror::Error;

pub use crate::checkpoint::CheckpointError;
pub use crate::playlist::PlaylistError;
pub use crate::service::ServiceError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the favorites sync library
///
/// Errors are categorized by the subsystem that raised them:
/// - Service errors: remote platform calls (search, collections)
/// - Checkpoint errors: reading and writing the pending-track file
/// - Playlist errors: loading the input track list
#[derive(Error, Debug)]
pub enum Error {
    /// Remote service errors
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Checkpoint persistence errors
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// Playlist input errors
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

impl Error {
    /// Whether the underlying cause is the platform's rate limiter. The
    /// orchestrator handles those with a cooldown instead of failing.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::Service(service) if service.is_rate_limit())
    }
}
