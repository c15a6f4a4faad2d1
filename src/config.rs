//! Client configuration
//!
//! Settings can come from defaults, a JSON file, or environment variables
//! (a `.env` file is honoured):
//!
//! - `CRYPTOCOMPARE_BASE_URL`
//! - `CRYPTOCOMPARE_TIMEOUT_MS`
//! - `CRYPTOCOMPARE_USER_AGENT`

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Public CryptoCompare min-API endpoint
pub const DEFAULT_BASE_URL: &str = "https://min-api.cryptocompare.com/";

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL request paths are resolved against
    pub base_url: String,
    /// Whole-request timeout in milliseconds, must be non-zero
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 30_000,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a JSON file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_file(path.as_ref())?.apply_env()
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ClientConfig =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        config.validate()
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    /// Override fields with any `CRYPTOCOMPARE_*` variables that are set
    pub fn apply_env(mut self) -> Result<Self> {
        dotenv::dotenv().ok();

        if let Ok(base_url) = std::env::var("CRYPTOCOMPARE_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("CRYPTOCOMPARE_TIMEOUT_MS") {
            self.timeout_ms = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid CRYPTOCOMPARE_TIMEOUT_MS: {}", timeout))?;
        }
        if let Ok(user_agent) = std::env::var("CRYPTOCOMPARE_USER_AGENT") {
            self.user_agent = user_agent;
        }

        self.validate()
    }

    /// Reject settings that would make every request fail
    pub fn validate(self) -> Result<Self> {
        if self.timeout_ms == 0 {
            bail!("timeout_ms must be greater than zero");
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout, kept at millisecond precision
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("cryptocompare-candles/"));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:9000/")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("tests");

        assert_eq!(config.base_url, "http://localhost:9000/");
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn test_sub_second_timeout_survives() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(900));

        assert_eq!(config.timeout_ms, 900);
        assert_eq!(config.timeout(), Duration::from_millis(900));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout_ms": 0}}"#).unwrap();
        assert!(ClientConfig::read_file(file.path()).is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_ms": 250}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "http://127.0.0.1:8080/", "timeout_ms": 3000}}"#).unwrap();

        let config = ClientConfig::read_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = ClientConfig::read_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config JSON"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ClientConfig::from_file("/nonexistent/cryptocompare.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
