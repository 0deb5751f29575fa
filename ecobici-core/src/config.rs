//! Fetcher configuration.
//!
//! Base URLs and timeouts are fixed at construction and never mutated, so a
//! fetcher can be pointed at a mock host in tests without touching globals.
//! Every key is optional in TOML; missing keys take the public Ecobici defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_GBFS_BASE_URL: &str = "https://gbfs.mex.lyftbikes.com";
pub const DEFAULT_ARCHIVE_BASE_URL: &str = "https://ecobici.cdmx.gob.mx";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Immutable endpoint and timeout settings for the feed fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Host serving the real-time GBFS feeds.
    pub gbfs_base_url: String,

    /// Host serving the monthly trip CSV archives.
    pub archive_base_url: String,

    pub connect_timeout_secs: u64,

    /// Whole-response timeout for GBFS requests.
    pub realtime_timeout_secs: u64,

    /// Whole-response timeout for archive requests (CSV files are large).
    pub archive_timeout_secs: u64,

    pub max_redirects: usize,

    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            gbfs_base_url: DEFAULT_GBFS_BASE_URL.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            realtime_timeout_secs: 30,
            archive_timeout_secs: 60,
            max_redirects: 10,
            user_agent: concat!("ecobici/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetcherConfig {
    /// Config pointing both hosts at the same base URL (mock servers, proxies).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            gbfs_base_url: base_url.to_string(),
            archive_base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject base URLs that are not absolute http(s) URLs, and zero timeouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("gbfs_base_url", &self.gbfs_base_url),
            ("archive_base_url", &self.archive_base_url),
        ] {
            let url = reqwest::Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{key} '{value}': {e}")))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::Invalid(format!(
                    "{key} '{value}': scheme must be http or https"
                )));
            }
        }

        for (key, value) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("realtime_timeout_secs", self.realtime_timeout_secs),
            ("archive_timeout_secs", self.archive_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{key} must be greater than zero")));
            }
        }

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn realtime_timeout(&self) -> Duration {
        Duration::from_secs(self.realtime_timeout_secs)
    }

    pub fn archive_timeout(&self) -> Duration {
        Duration::from_secs(self.archive_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_endpoints() {
        let config = FetcherConfig::default();
        assert_eq!(config.gbfs_base_url, "https://gbfs.mex.lyftbikes.com");
        assert_eq!(config.archive_base_url, "https://ecobici.cdmx.gob.mx");
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.realtime_timeout(), Duration::from_secs(30));
        assert_eq!(config.archive_timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = FetcherConfig::from_toml_str("").unwrap();
        assert_eq!(config, FetcherConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config = FetcherConfig::from_toml_str(
            r#"
            gbfs_base_url = "http://localhost:8080"
            archive_timeout_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(config.gbfs_base_url, "http://localhost:8080");
        assert_eq!(config.archive_timeout_secs, 120);
        assert_eq!(config.archive_base_url, DEFAULT_ARCHIVE_BASE_URL);
        assert_eq!(config.realtime_timeout_secs, 30);
    }

    #[test]
    fn rejects_relative_base_url() {
        let err = FetcherConfig::from_toml_str(r#"archive_base_url = "/wp-content""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = FetcherConfig::from_toml_str(r#"gbfs_base_url = "ftp://example.com""#).unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = FetcherConfig::from_toml_str("realtime_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("realtime_timeout_secs"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = FetcherConfig::from_toml_str("gbfs_base_url = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("ecobici_missing_config_does_not_exist.toml");
        let err = FetcherConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("ecobici_config_{}.toml", std::process::id()));
        std::fs::write(&path, "max_redirects = 3\n").unwrap();
        let config = FetcherConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.max_redirects, 3);
    }
}
