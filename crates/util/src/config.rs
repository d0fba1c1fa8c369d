//! Configuration loading for the fieldhint CLI/TUI.
//!
//! Settings are read from a small JSON file in the standard configuration
//! directory (`~/.config/fieldhint/config.json` on most platforms). A missing
//! file yields defaults, a malformed one is reported with a warning and also
//! yields defaults. Selected values can be overridden from the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::path_processing::config_file_path;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "FIELDHINT_CONFIG_PATH";
/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";
/// Overrides `api.base_url`.
pub const API_BASE_ENV: &str = "FIELDHINT_API_BASE";
/// Overrides `api.token`.
pub const API_TOKEN_ENV: &str = "FIELDHINT_API_TOKEN";
/// When truthy, forces the local JSON store instead of the HTTP backend.
pub const OFFLINE_ENV: &str = "FIELDHINT_OFFLINE";

/// Error surfaced when reading configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure (for example, permissions).
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The configured base URL cannot be parsed.
    #[error("invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Connection settings for the suggestion store backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub search_path: String,
    pub save_path: String,
    /// Bearer token sent with every request when present.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            search_path: "/api/suggestions/search".into(),
            save_path: "/api/suggestions/save".into(),
            token: None,
            timeout_secs: 10,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// A blank base URL turns suggestions off for every field.
    pub fn is_disabled(&self) -> bool {
        self.base_url.trim().is_empty()
    }

    /// Parse `base_url`, rejecting values that are not absolute URLs.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })
    }
}

/// Settings for the offline JSON store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Use the local store instead of the HTTP backend.
    pub offline: bool,
    /// Explicit store file; defaults to `suggestions.json` in the config dir.
    pub path: Option<PathBuf>,
    /// Maximum rows returned by a local search.
    pub max_results: usize,
    /// Maximum values retained per field category.
    pub max_entries_per_field: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            offline: false,
            path: None,
            max_results: 10,
            max_entries_per_field: 500,
        }
    }
}

/// Timing and threshold knobs for the input widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub single_line_min_length: usize,
    pub single_line_debounce_ms: u64,
    pub multi_line_debounce_ms: u64,
    pub blur_grace_ms: u64,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            single_line_min_length: 2,
            single_line_debounce_ms: 300,
            multi_line_debounce_ms: 500,
            blur_grace_ms: 200,
        }
    }
}

/// Complete configuration payload.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldhintConfig {
    pub api: ApiSettings,
    pub store: StoreSettings,
    pub widgets: WidgetSettings,
}

impl FieldhintConfig {
    /// Load from the default location (or `FIELDHINT_CONFIG_PATH`) and apply
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Load from an explicit path and apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = load_payload(path)?;
        config.apply_env_overrides();
        if !config.api.is_disabled() {
            config.api.parsed_base_url()?;
        }
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(base) = non_empty_env(API_BASE_ENV) {
            self.api.base_url = base;
        }
        if let Some(token) = non_empty_env(API_TOKEN_ENV) {
            self.api.token = Some(token);
        }
        if let Some(flag) = non_empty_env(OFFLINE_ENV) {
            self.store.offline = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
    }
}

pub fn default_config_path() -> PathBuf {
    config_file_path(CONFIG_PATH_ENV, CONFIG_FILE_NAME)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn load_payload(path: &Path) -> Result<FieldhintConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse config file; using defaults"
                );
                Ok(FieldhintConfig::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(FieldhintConfig::default()),
        Err(error) => Err(ConfigError::Io(error)),
    }
}
