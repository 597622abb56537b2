//! Application settings
//!
//! Settings are resolved in three layers:
//! 1. Embedded defaults (compiled into binary from `config/macrolens.toml`)
//! 2. Override file: an explicit path, else the data dir
//!    (~/.local/share/macrolens/config/macrolens.toml) when present
//! 3. `MACROLENS_*` environment variables

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/macrolens.toml");

/// Largest page size accepted by paginated queries
pub const MAX_PAGE_SIZE: i64 = 500;

/// Longest accepted re-sync interval (one year)
pub const MAX_SYNC_INTERVAL_HOURS: u64 = 24 * 366;

pub const ENV_DB: &str = "MACROLENS_DB";
pub const ENV_SOURCE_URL: &str = "MACROLENS_SOURCE_URL";
pub const ENV_SOURCE_TIMEOUT: &str = "MACROLENS_SOURCE_TIMEOUT";
pub const ENV_PAGE_SIZE: &str = "MACROLENS_PAGE_SIZE";
pub const ENV_CORS_ORIGINS: &str = "MACROLENS_CORS_ORIGINS";
pub const ENV_SYNC_INTERVAL: &str = "MACROLENS_SYNC_INTERVAL";

/// Upstream SGS source settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Base URL; the series code is appended as `.{code}/dados`
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.bcb.gov.br/dados/serie/bcdata.sgs".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SourceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolved application settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_name: String,
    pub database_path: String,
    /// Default page size for paginated series detail
    pub page_size: i64,
    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
    /// Automatic re-sync interval; `None` or 0 disables it
    pub sync_interval_hours: Option<u64>,
    pub source: SourceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Macro Insights API".to_string(),
            database_path: "macrolens.db".to_string(),
            page_size: 50,
            cors_origins: vec![],
            sync_interval_hours: None,
            source: SourceSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from all layers, reading overrides from the process environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = read_config(override_path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML, filling missing keys with defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid settings: {}", e)))
    }

    /// Apply `MACROLENS_*` overrides using `lookup` to read variables
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DB) {
            self.database_path = path;
        }
        if let Some(url) = get(ENV_SOURCE_URL) {
            self.source.base_url = url;
        }
        if let Some(raw) = get(ENV_SOURCE_TIMEOUT) {
            self.source.timeout_secs = parse_number(ENV_SOURCE_TIMEOUT, &raw)?;
        }
        if let Some(raw) = get(ENV_PAGE_SIZE) {
            self.page_size = parse_number(ENV_PAGE_SIZE, &raw)?;
        }
        if let Some(raw) = get(ENV_CORS_ORIGINS) {
            self.cors_origins = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(raw) = get(ENV_SYNC_INTERVAL) {
            self.sync_interval_hours = Some(parse_number(ENV_SYNC_INTERVAL, &raw)?);
        }
        Ok(())
    }

    /// Reject values the rest of the system cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.source.timeout_secs == 0 {
            return Err(Error::Config("source.timeout_secs must be positive".into()));
        }
        if let Some(hours) = self.sync_interval_hours {
            if hours > MAX_SYNC_INTERVAL_HOURS {
                return Err(Error::Config(format!(
                    "sync_interval_hours must be at most {}, got {}",
                    MAX_SYNC_INTERVAL_HOURS, hours
                )));
            }
        }
        if self.source.base_url.trim().is_empty() {
            return Err(Error::Config("source.base_url is empty".into()));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("macrolens").join("config").join("macrolens.toml"))
}

/// Read the first existing layer: explicit path, data-dir override, embedded default
fn read_config(override_path: Option<&Path>) -> Result<String> {
    let candidate = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    match candidate {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading settings override");
            fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })
        }
        Some(path) if override_path.is_some() => Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        ))),
        _ => Ok(DEFAULT_CONFIG.to_string()),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a number, got '{}'", key, raw)))
}
