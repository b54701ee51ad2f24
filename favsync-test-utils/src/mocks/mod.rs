//! Mock implementations for testing

mod playlist_source;
mod video_service;

pub use playlist_source::MockPlaylistSource;
pub use video_service::MockVideoService;
