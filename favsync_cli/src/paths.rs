//! Centralized path management for the favsync CLI
//!
//! This module provides utilities for consistently locating the config
//! file, the checkpoint, and the credentials file across the application.

use std::path::PathBuf;

/// The name of the application directory used across all platforms
const APP_DIR: &str = "favsync";

/// The name of the checkpoint file holding pending tracks
const CHECKPOINT_FILE: &str = "checkpoint.json";

/// The name of the file holding the session cookies
const CREDENTIALS_FILE: &str = "credentials.json";

/// The name of the configuration file
const CONFIG_FILE: &str = "config.toml";

/// Returns the base data directory for the application
///
/// On Unix-like systems (Linux, macOS), this uses the XDG Base Directory
/// specification:
/// - `~/.local/share/favsync`
///
/// On Windows, this uses the user's application data directory:
/// - `%APPDATA%/favsync`
///
/// If the standard directories cannot be determined, falls back to
/// `.favsync` in the current directory.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".favsync"))
}

/// Returns the path to the configuration directory
///
/// On Unix-like systems, this uses the XDG Config Home:
/// - `~/.config/favsync`
///
/// This is separate from the data directory to follow platform conventions.
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".favsync"))
}

/// Returns the path to the configuration file
pub fn get_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE)
}

/// Returns the default path for the pending-track checkpoint
pub fn get_checkpoint_path() -> PathBuf {
    get_data_dir().join(CHECKPOINT_FILE)
}

/// Returns the default path for the credentials file
pub fn get_credentials_path() -> PathBuf {
    get_config_dir().join(CREDENTIALS_FILE)
}
