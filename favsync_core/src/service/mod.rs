//! Video service capability interfaces
//!
//! The sync pipeline talks to the platform exclusively through the
//! [`VideoService`] trait; the concrete HTTP client lives in
//! [`bilibili`].

pub mod bilibili;
pub mod error;

pub use self::bilibili::{BilibiliClient, BilibiliConfig, Credential};
pub use self::error::ServiceError;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::track::{SearchCandidate, VideoId};

/// Opaque identifier of a favorites collection, returned at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionId(pub u64);

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visibility of a created collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Search and favorites operations of the video platform.
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Run a keyword search, returning candidates in platform ranking order.
    /// An empty list means the platform genuinely reported no results.
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, ServiceError>;

    /// Create a favorites collection and return its id.
    async fn create_collection(
        &self,
        name: &str,
        visibility: Visibility,
    ) -> Result<CollectionId, ServiceError>;

    /// Add a video to an existing collection.
    async fn add_to_collection(
        &self,
        collection: CollectionId,
        video: VideoId,
    ) -> Result<(), ServiceError>;
}
