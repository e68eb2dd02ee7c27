//! Configuration management for FeedKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Remote service settings (base URL, timeouts, endpoint paths)
//! - Synchronization settings (staleness polling)
//! - Display preferences (measurement system)
//! - Storage settings (preference file location)

use crate::error::{ConfigError, SettingsError, SettingsResult};
pub use feedkit_core::units::MeasurementSystem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "feedkit";

/// Remote calculation service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Path of the calculation endpoint
    pub resolve_path: String,
    /// Path of the share endpoint
    pub share_path: String,
    /// Path of the preference reset endpoint
    pub reset_path: String,
    /// Path prefix of the catalog listings
    pub catalog_path: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://backend.smartcnc.site/api".to_string(),
            request_timeout_ms: 15_000,
            resolve_path: "/resolve".to_string(),
            share_path: "/share-settings".to_string(),
            reset_path: "/reset-preference".to_string(),
            catalog_path: "/get-all".to_string(),
        }
    }
}

impl RemoteSettings {
    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Join the base URL with an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Staleness polling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// How often a focused screen checks the invalidation token
    pub poll_interval_ms: u64,
    /// Keep a history of published events
    pub event_history: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            event_history: false,
        }
    }
}

impl SyncSettings {
    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Display preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Measurement system used for lengths and speeds
    pub measurement_system: MeasurementSystem,
}

/// Preference storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Preference file; the platform data directory is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences_file: Option<PathBuf>,
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote service settings
    pub remote: RemoteSettings,
    /// Synchronization settings
    pub sync: SyncSettings,
    /// Display preferences
    pub display: DisplaySettings,
    /// Storage settings
    pub storage: StorageSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/feedkit/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("config.toml"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Load the config at `path`, or the default location, falling back
    /// to defaults when the file does not exist
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(e.to_string()))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.remote.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "remote.base_url".to_string(),
                reason: "must be an http(s) URL".to_string(),
            });
        }

        if self.remote.request_timeout_ms == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "remote.request_timeout_ms".to_string(),
                value: "0".to_string(),
            });
        }

        if self.sync.poll_interval_ms == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "sync.poll_interval_ms".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Resolved preference file location
    pub fn preferences_path(&self) -> SettingsResult<PathBuf> {
        if let Some(path) = &self.storage.preferences_file {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join("preferences.json"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
