//! Application configuration from TOML files and environment variables.
//!
//! Environment variables win over file values; both fall back to the
//! defaults the dashboard shipped with (60 s merge-view TTL, 120 s
//! review-view TTL, 3 read attempts with 1 s linear backoff).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::error::{StoreError, StoreResult};
use super::retry::RetryPolicy;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub workbook: WorkbookSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workbook: WorkbookSettings::default(),
            cache: CacheSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

/// Worksheet titles within the workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookSettings {
    #[serde(default = "default_roster_sheet")]
    pub roster_sheet: String,
    #[serde(default = "default_metrics_sheet")]
    pub metrics_sheet: String,
}

impl Default for WorkbookSettings {
    fn default() -> Self {
        Self {
            roster_sheet: default_roster_sheet(),
            metrics_sheet: default_metrics_sheet(),
        }
    }
}

/// Cache time-to-live settings, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// TTL for the merge (upload reconciliation) view.
    #[serde(default = "default_merge_ttl_secs")]
    pub merge_ttl_secs: u64,
    /// TTL for the credibility review view.
    #[serde(default = "default_review_ttl_secs")]
    pub review_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            merge_ttl_secs: default_merge_ttl_secs(),
            review_ttl_secs: default_review_ttl_secs(),
        }
    }
}

impl CacheSettings {
    pub fn merge_ttl(&self) -> Duration {
        Duration::from_secs(self.merge_ttl_secs)
    }

    pub fn review_ttl(&self) -> Duration {
        Duration::from_secs(self.review_ttl_secs)
    }
}

/// Retry settings for idempotent reads and the authorization handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

fn default_roster_sheet() -> String {
    "Influencers List".to_string()
}

fn default_metrics_sheet() -> String {
    "Master".to_string()
}

fn default_merge_ttl_secs() -> u64 {
    60
}

fn default_review_ttl_secs() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl AppConfig {
    /// Read configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            StoreError::configuration(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&contents).map_err(|e| {
            StoreError::configuration(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Build configuration from environment variables over defaults.
    ///
    /// # Environment Variables
    /// - `IVC_ROSTER_SHEET`: roster worksheet title
    /// - `IVC_METRICS_SHEET`: metrics worksheet title
    /// - `IVC_MERGE_TTL_SECS` / `IVC_REVIEW_TTL_SECS`: cache TTLs
    /// - `IVC_RETRY_MAX_ATTEMPTS` / `IVC_RETRY_BASE_DELAY_MS`: retry policy
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("IVC_ROSTER_SHEET") {
            config.workbook.roster_sheet = v;
        }
        if let Ok(v) = std::env::var("IVC_METRICS_SHEET") {
            config.workbook.metrics_sheet = v;
        }
        if let Some(v) = env_parse("IVC_MERGE_TTL_SECS") {
            config.cache.merge_ttl_secs = v;
        }
        if let Some(v) = env_parse("IVC_REVIEW_TTL_SECS") {
            config.cache.review_ttl_secs = v;
        }
        if let Some(v) = env_parse("IVC_RETRY_MAX_ATTEMPTS") {
            config.retry.max_attempts = v;
        }
        if let Some(v) = env_parse("IVC_RETRY_BASE_DELAY_MS") {
            config.retry.base_delay_ms = v;
        }
        config
    }

    /// Load configuration: `IVC_CONFIG` file when set, else environment.
    pub fn load() -> StoreResult<Self> {
        match std::env::var("IVC_CONFIG") {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::from_env()),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
