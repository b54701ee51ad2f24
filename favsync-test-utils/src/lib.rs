//! Test utilities for the favorites sync crates
//!
//! This crate provides mock implementations and test data builders for
//! testing sync functionality without files or network connectivity.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use mocks::{MockPlaylistSource, MockVideoService};
