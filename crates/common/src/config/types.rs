//! # Configuration Types
//!
//! Common configuration structures shared by the registrar components.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigurationError, RegistryBaseError};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Idle timeout for connections
    pub idle_timeout: Option<Duration>,

    /// Maximum lifetime for connections
    pub max_lifetime: Option<Duration>,

    /// Whether to run schema bootstrap on startup
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(3600)),
            run_migrations: true,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Binding host (default: "0.0.0.0")
    pub host: String,

    /// Binding port
    pub port: u16,

    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Get the listening address
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Common configuration validation trait
pub trait ConfigValidation {
    type Error: RegistryBaseError;

    /// Validate the configuration
    fn validate(&self) -> Result<(), Self::Error>;

    /// Get configuration warnings (non-fatal issues)
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

impl ConfigValidation for DatabaseConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.url.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                key: "url".to_string(),
                value: self.url.clone(),
                reason: "Database URL cannot be empty".to_string(),
            });
        }

        if self.max_connections == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "max_connections".to_string(),
                value: self.max_connections.to_string(),
                reason: "Max connections must be greater than 0".to_string(),
            });
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigurationError::InvalidValue {
                key: "min_connections".to_string(),
                value: self.min_connections.to_string(),
                reason: "Min connections cannot be greater than max connections".to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigValidation for ServerConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.port == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "port".to_string(),
                value: self.port.to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.host.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                key: "host".to_string(),
                value: self.host.clone(),
                reason: "Host cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigValidation for LoggingConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigurationError::InvalidValue {
                    key: "level".to_string(),
                    value: self.level.clone(),
                    reason: "Unknown log level. Valid levels are: trace, debug, info, warn, error"
                        .to_string(),
                })
            }
        }

        match self.format.as_str() {
            "json" | "pretty" | "compact" => Ok(()),
            _ => Err(ConfigurationError::InvalidValue {
                key: "format".to_string(),
                value: self.format.clone(),
                reason: "Unknown log format. Valid formats are: json, pretty, compact".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_validation() {
        assert!(DatabaseConfig::default().validate().is_ok());

        let empty_url = DatabaseConfig {
            url: String::new(),
            ..Default::default()
        };
        assert!(empty_url.validate().is_err());

        let inverted_pool = DatabaseConfig {
            min_connections: 20,
            max_connections: 10,
            ..Default::default()
        };
        assert!(inverted_pool.validate().is_err());
    }

    #[test]
    fn test_server_config_listen_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(config.listen_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_server_config_rejects_zero_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        assert!(LoggingConfig::default().validate().is_ok());

        let bad_level = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(bad_level.validate().is_err());

        let bad_format = LoggingConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(bad_format.validate().is_err());
    }
}
