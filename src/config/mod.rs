//! Configuration module for SafeRoute
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SAFEROUTE_*`, `JAMAI_*`, `ACTION_TABLE_ID`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use saferoute::config::SafeRouteConfig;
//!
//! let config = SafeRouteConfig::default();
//! assert_eq!(config.polling.max_attempts, 15);
//!
//! let toml = r#"
//! [remote]
//! table_id = "flood_routing"
//! "#;
//! let config: SafeRouteConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.remote.table_id, "flood_routing");
//! assert_eq!(config.remote.table_type, "action");
//! ```

pub mod error;
pub mod knowledge;
pub mod logging;
pub mod polling;
pub mod remote;
pub mod server;

pub use error::ConfigError;
pub use knowledge::KnowledgeConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;
pub use remote::{Credentials, RemoteConfig};
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified, immutable-after-load configuration.
///
/// Built once at startup and handed to each component by reference or `Arc`;
/// nothing reads the environment after this point.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SafeRouteConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Remote table service location and credentials
    pub remote: RemoteConfig,
    /// Completion polling budget
    pub polling: PollingConfig,
    /// Static grounding text for the routing prompt
    pub knowledge: KnowledgeConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl SafeRouteConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Unparseable numeric or enum values are ignored and the previous value kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("SAFEROUTE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("SAFEROUTE_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("SAFEROUTE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SAFEROUTE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self.remote.apply_env();
        self
    }

    /// Validate configuration
    ///
    /// Credentials are deliberately not checked here; see [`RemoteConfig::credentials`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "port must be non-zero"));
        }
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        if self.polling.interval_ms == 0 {
            return Err(ConfigError::invalid("polling.interval_ms", "interval must be non-zero"));
        }
        if self.polling.max_attempts == 0 {
            return Err(ConfigError::invalid(
                "polling.max_attempts",
                "at least one attempt is required",
            ));
        }
        if self.polling.total_budget() >= self.server.request_timeout() {
            return Err(ConfigError::invalid(
                "polling.max_attempts",
                format!(
                    "polling sleeps up to {}ms, which does not fit in the {}s request timeout",
                    self.polling.total_budget().as_millis(),
                    self.server.request_timeout_seconds
                ),
            ));
        }

        if self.remote.table_id.trim().is_empty() {
            return Err(ConfigError::invalid("remote.table_id", "table id cannot be empty"));
        }
        let urls = [
            ("remote.api_url", Some(self.remote.api_url.as_str())),
            ("remote.table_api_url", self.remote.table_api_url.as_deref()),
        ];
        for (field, url) in urls {
            let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
                continue;
            };
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::invalid(
                    field,
                    format!("'{}' is not an http(s) URL", url),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_config_defaults() {
        let config = SafeRouteConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.polling.interval_ms, 2000);
        assert_eq!(config.remote.table_id, "emergency_routing");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_example_toml() {
        let toml = include_str!("../../saferoute.example.toml");
        let config: SafeRouteConfig = toml::from_str(toml).unwrap();
        assert!(config.server.port > 0);
        assert!(config.polling.max_attempts > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[polling]\ninterval_ms = 1500\nmax_attempts = 10").unwrap();

        let config = SafeRouteConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.polling.interval_ms, 1500);
        assert_eq!(config.polling.max_attempts, 10);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[polling\nmax_attempts = ").unwrap();

        let result = SafeRouteConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = SafeRouteConfig::load(Some(Path::new("/nonexistent/saferoute.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = SafeRouteConfig::load(None).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_config_env_overrides() {
        std::env::set_var("SAFEROUTE_PORT", "9100");
        std::env::set_var("SAFEROUTE_LOG_FORMAT", "json");
        std::env::set_var("ACTION_TABLE_ID", "action-routing");
        let config = SafeRouteConfig::default().with_env_overrides();
        std::env::remove_var("SAFEROUTE_PORT");
        std::env::remove_var("SAFEROUTE_LOG_FORMAT");
        std::env::remove_var("ACTION_TABLE_ID");

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.remote.table_id, "action-routing");

        // Unparseable values keep the previous setting
        std::env::set_var("SAFEROUTE_PORT", "eighty");
        let config = SafeRouteConfig::default().with_env_overrides();
        std::env::remove_var("SAFEROUTE_PORT");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_config_validation_zero_interval() {
        let mut config = SafeRouteConfig::default();
        config.polling.interval_ms = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "polling.interval_ms"
        ));
    }

    #[test]
    fn test_config_validation_zero_attempts() {
        let mut config = SafeRouteConfig::default();
        config.polling.max_attempts = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "polling.max_attempts"
        ));
    }

    #[test]
    fn test_config_validation_poll_budget_exceeds_request_timeout() {
        let mut config = SafeRouteConfig::default();
        config.server.request_timeout_seconds = 20;
        config.polling.interval_ms = 2000;
        config.polling.max_attempts = 11;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "polling.max_attempts"
        ));

        config.polling.max_attempts = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_override_url_scheme() {
        let mut config = SafeRouteConfig::default();
        config.remote.table_api_url = Some("ftp://tables".to_string());

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "remote.table_api_url"
        ));
    }

    #[test]
    fn test_config_validation_api_url_scheme() {
        let mut config = SafeRouteConfig::default();
        config.remote.api_url = "api.jamaibase.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "remote.api_url"
        ));

        config.remote.api_url = "https://api.jamaibase.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_does_not_require_credentials() {
        let config = SafeRouteConfig::default();
        assert!(!config.remote.has_credentials());
        assert!(config.validate().is_ok());
    }
}
