//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::TableDefaults;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default listening port
pub const DEFAULT_PORT: u16 = 1337;

/// Application configuration
///
/// Every key is optional; missing keys take the [`Default`] values.
///
/// ```yaml
/// app_name: Accounts API
/// port: 8080
/// url_prefix: /api
/// logging:
///   level: debug
/// cors:
///   enabled: true
///   allowed_origins: ["https://app.example.com"]
/// table:
///   limit: 50
///   order_by: created_at
/// catch_all: true
/// health: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,

    /// Prefix prepended to every resource and group route
    pub url_prefix: String,

    pub logging: LoggingConfig,
    pub cors: CorsConfig,

    /// Table query defaults for resources that do not supply their own
    pub table: TableDefaults,

    /// Answer unmatched routes with a JSON 404 envelope
    pub catch_all: bool,

    /// Mount `GET /health`
    pub health: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "restkit".to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            url_prefix: "/".to_string(),
            logging: LoggingConfig::default(),
            cors: CorsConfig::default(),
            table: TableDefaults::default(),
            catch_all: false,
            health: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "restkit=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,

    /// Allowed origins; empty or `*` allows any origin
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn permissive() -> Self {
        Self {
            enabled: true,
            allowed_origins: Vec::new(),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that the rest of the crate trusts without re-checking
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.table
            .validate()
            .map_err(|message| ConfigError::InvalidValue {
                field: "table".to_string(),
                value: format!(
                    "page={} limit={} order_dir={}",
                    self.table.page, self.table.limit, self.table.order_dir
                ),
                message,
            })?;

        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                value: "0".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        Ok(())
    }

    /// `host:port` string to bind the listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level. Safe to call multiple times
/// (subsequent calls are no-ops).
pub fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 1337);
        assert_eq!(config.url_prefix, "/");
        assert_eq!(config.table, TableDefaults::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:1337");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str(
            r#"
app_name: Sweets API
port: 8080
table:
  limit: 50
"#,
        )
        .unwrap();
        assert_eq!(config.app_name, "Sweets API");
        assert_eq!(config.port, 8080);
        assert_eq!(config.table.limit, 50);
        assert_eq!(config.table.order_by, "id");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_table_defaults_rejected() {
        let err = AppConfig::from_yaml_str("table:\n  limit: 500\n").unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(config_err, ConfigError::InvalidValue { field, .. } if field == "table"));

        assert!(AppConfig::from_yaml_str("table:\n  order_dir: DESC\n").is_err());
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = AppConfig::from_yaml_str("port: [not a port").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_cors_any_origin() {
        assert!(CorsConfig::permissive().allows_any_origin());
        let strict = CorsConfig {
            enabled: true,
            allowed_origins: vec!["https://app.example.com".to_string()],
        };
        assert!(!strict.allows_any_origin());
    }
}
