use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use favsync_core::matcher::{
    DEFAULT_MAX_DURATION_SECS, DEFAULT_MIN_DURATION_SECS, DurationMatcher,
};
use favsync_core::orchestrator::{
    DEFAULT_COOLDOWN, DEFAULT_SEARCH_DELAY, SyncConfig, TransportErrorPolicy,
};
use favsync_core::ratelimit::DEFAULT_NOT_FOUND_THRESHOLD;
use favsync_core::service::{BilibiliConfig, Credential, Visibility};

use crate::paths;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub sync: SyncSection,

    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub collection: CollectionSection,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PathsConfig {
    /// JSON playlist to sync. Optional here since the run command can take
    /// it as an argument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist: Option<PathBuf>,
    /// Where the pending-track checkpoint lives.
    pub checkpoint: PathBuf,
    /// JSON file holding the session cookies.
    pub credentials: PathBuf,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SyncSection {
    pub search_delay_secs: u64,
    pub cooldown_secs: u64,
    pub not_found_threshold: u32,
    pub transport_error_policy: TransportErrorPolicy,
    pub min_duration_secs: u32,
    pub max_duration_secs: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServiceSection {
    pub api_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CollectionSection {
    /// Fixed collection name; a timestamp name is generated when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
    pub visibility: Visibility,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            playlist: None,
            checkpoint: paths::get_checkpoint_path(),
            credentials: paths::get_credentials_path(),
        }
    }
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            search_delay_secs: DEFAULT_SEARCH_DELAY.as_secs(),
            cooldown_secs: DEFAULT_COOLDOWN.as_secs(),
            not_found_threshold: DEFAULT_NOT_FOUND_THRESHOLD,
            transport_error_policy: TransportErrorPolicy::default(),
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

impl Default for ServiceSection {
    fn default() -> Self {
        let base = BilibiliConfig::default();
        Self {
            api_base: base.api_base,
            user_agent: base.user_agent,
            timeout_secs: base.timeout.as_secs(),
        }
    }
}

impl Default for CollectionSection {
    fn default() -> Self {
        Self {
            name: None,
            description: BilibiliConfig::default().collection_intro,
            visibility: Visibility::default(),
        }
    }
}

impl AppConfig {
    /// Orchestrator settings assembled from the sync and collection sections.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            collection_name: self.collection.name.clone(),
            visibility: self.collection.visibility,
            search_delay: Duration::from_secs(self.sync.search_delay_secs),
            cooldown: Duration::from_secs(self.sync.cooldown_secs),
            not_found_threshold: self.sync.not_found_threshold,
            transport_error_policy: self.sync.transport_error_policy,
            matcher: DurationMatcher::new(
                self.sync.min_duration_secs,
                self.sync.max_duration_secs,
            ),
        }
    }

    /// Platform client settings assembled from the service section.
    pub fn service_config(&self) -> BilibiliConfig {
        BilibiliConfig {
            api_base: self.service.api_base.clone(),
            user_agent: self.service.user_agent.clone(),
            timeout: Duration::from_secs(self.service.timeout_secs),
            collection_intro: self.collection.description.clone(),
        }
    }
}

/// Configuration manager that handles XDG-compliant paths and layered
/// configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with the default XDG-compliant path
    pub fn new() -> Self {
        Self {
            config_path: paths::get_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Environment variables
        figment = figment.merge(Env::prefixed("FAVSYNC_").split("__"));

        figment.extract().context("Failed to load configuration")
    }
}

/// Load the configuration, optionally from an explicit file path.
pub fn get_config(path: Option<&Path>) -> Result<AppConfig> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path.to_path_buf()),
        None => ConfigManager::new(),
    };
    manager.load()
}

/// Read the session cookie pair from a JSON credentials file.
pub fn load_credential(path: &Path) -> Result<Credential> {
    let raw = std::fs::read_to_string(path).with_context(|| {
        format!("Failed to read credentials from {}", path.display())
    })?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Malformed credentials file {}", path.display()))
}
