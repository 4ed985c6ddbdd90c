//! Configuration management for Courier
//!
//! This module provides environment-based configuration management with
//! support for defaults, TOML files, and validation. The settings here are
//! consumed by the send pipeline and forwarded to the discovery and
//! transport collaborators.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP transport configuration
    pub http: HttpConfig,

    /// Retry configuration forwarded to the transport collaborator
    pub retry: RetryConfig,

    /// Endpoint discovery configuration
    pub discovery: DiscoveryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connection establishment timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Timeout for the full send-and-await-signal round trip
    #[serde(with = "humantime_serde")]
    pub response_timeout: Duration,

    /// User-Agent header value
    pub user_agent: String,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,

    /// Interval between retries
    #[serde(with = "humantime_serde")]
    pub retry_interval: Duration,
}

/// Endpoint discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Timeout for one SMP lookup
    #[serde(with = "humantime_serde")]
    pub lookup_timeout: Duration,

    /// Wildcard selection mode name used when none is set on the provider
    /// (wildcard-only, busdox-then-wildcard, wildcard-then-busdox)
    pub wildcard_mode: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,

    /// Log file path (optional)
    pub log_file: Option<PathBuf>,
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable metrics collection
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            discovery: DiscoveryConfig::default(),
            logging: LoggingConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            response_timeout: Duration::from_secs(120),
            user_agent: format!("courier/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            retry_interval: Duration::from_secs(10),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(30),
            wildcard_mode: "wildcard-only".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
            log_file: None,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: COURIER_<SECTION>_<KEY>
    /// Example: COURIER_HTTP_RESPONSE_TIMEOUT=60s
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // HTTP config
        if let Ok(timeout) = env::var("COURIER_HTTP_CONNECT_TIMEOUT") {
            config.http.connect_timeout = parse_duration(&timeout, "connect timeout")?;
        }
        if let Ok(timeout) = env::var("COURIER_HTTP_RESPONSE_TIMEOUT") {
            config.http.response_timeout = parse_duration(&timeout, "response timeout")?;
        }
        if let Ok(agent) = env::var("COURIER_HTTP_USER_AGENT") {
            config.http.user_agent = agent;
        }

        // Retry config
        if let Ok(retries) = env::var("COURIER_RETRY_MAX_RETRIES") {
            config.retry.max_retries = retries
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid max retries: {}", e)))?;
        }
        if let Ok(interval) = env::var("COURIER_RETRY_INTERVAL") {
            config.retry.retry_interval = parse_duration(&interval, "retry interval")?;
        }

        // Discovery config
        if let Ok(timeout) = env::var("COURIER_DISCOVERY_LOOKUP_TIMEOUT") {
            config.discovery.lookup_timeout = parse_duration(&timeout, "lookup timeout")?;
        }
        if let Ok(mode) = env::var("COURIER_DISCOVERY_WILDCARD_MODE") {
            config.discovery.wildcard_mode = mode;
        }

        // Logging config
        if let Ok(level) = env::var("COURIER_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = env::var("COURIER_LOG_JSON") {
            config.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON flag: {}", e)))?;
        }

        // Metrics config
        if let Ok(enabled) = env::var("COURIER_METRICS_ENABLED") {
            config.metrics.enabled = enabled
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid metrics flag: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.connect_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "http.connect_timeout must be non-zero".to_string(),
            ));
        }
        if self.http.response_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "http.response_timeout must be non-zero".to_string(),
            ));
        }
        if crate::logging::LogLevel::from_str(&self.logging.level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        match self.discovery.wildcard_mode.as_str() {
            "wildcard-only" | "busdox-then-wildcard" | "wildcard-then-busdox" => {}
            other => {
                return Err(ConfigError::ValidationFailed(format!(
                    "unknown wildcard mode '{}'",
                    other
                )));
            }
        }
        Ok(())
    }
}

fn parse_duration(value: &str, what: &str) -> Result<Duration, ConfigError> {
    humantime_serde::re::humantime::parse_duration(value)
        .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", what, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.http.response_timeout = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_wildcard_mode() {
        let mut config = Config::default();
        config.discovery.wildcard_mode = "exact".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
            [http]
            connect_timeout = "5s"
            response_timeout = "90s"
            user_agent = "courier-test"

            [retry]
            max_retries = 3
            retry_interval = "15s"

            [discovery]
            lookup_timeout = "20s"
            wildcard_mode = "busdox-then-wildcard"

            [logging]
            level = "debug"
            json_format = false
            with_timestamp = true
            with_target = true

            [metrics]
            enabled = false
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.http.connect_timeout, Duration::from_secs(5));
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.retry.max_retries, config.retry.max_retries);
        assert_eq!(parsed.logging.level, config.logging.level);
    }
}
