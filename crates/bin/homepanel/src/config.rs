//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homepanel.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use homepanel_app::component::SyncPolicy;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resource server settings.
    pub server: ServerConfig,
    /// Optimistic update behaviour.
    pub sync: SyncConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL the `data/{name}.json` paths are resolved against.
    pub url: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Restore the previous value when a write fails.
    pub rollback_on_write_failure: bool,
    /// Drop fetched values that arrive after a local edit.
    pub discard_superseded_fetches: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `homepanel.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("homepanel.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HOMEPANEL_URL") {
            self.server.url = val;
        }
        if let Some(secs) = var("HOMEPANEL_TIMEOUT_SECS").and_then(|val| val.parse().ok()) {
            self.server.timeout_secs = secs;
        }
        if let Some(flag) = var("HOMEPANEL_ROLLBACK").and_then(|val| parse_flag(&val)) {
            self.sync.rollback_on_write_failure = flag;
        }
        if let Some(val) = var("HOMEPANEL_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.server.url)
            .map_err(|err| ConfigError::Validation(format!("server url: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "server url must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    #[must_use]
    pub fn sync_policy(&self) -> SyncPolicy {
        SyncPolicy {
            rollback_on_write_failure: self.sync.rollback_on_write_failure,
            discard_superseded_fetches: self.sync.discard_superseded_fetches,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/".to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        let policy = SyncPolicy::default();
        Self {
            rollback_on_write_failure: policy.rollback_on_write_failure,
            discard_superseded_fetches: policy.discard_superseded_fetches,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homepanel=info,homepanel_app=info,homepanel_adapter_http_reqwest=info"
                .to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
