//! Favorites Sync CLI Library
//!
//! Command implementations, configuration loading, and terminal output
//! for the `favsync` binary.

pub mod commands;
pub mod config;
pub mod output;
pub mod paths;
