//! Registrar service configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use common::config::{
    load_config, load_from_file, ConfigValidation, DatabaseConfig, LoggingConfig, ServerConfig,
};
use common::error::ConfigurationError;

/// Top-level configuration for the registrar service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrarConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:./registrar.db".to_string(),
                ..Default::default()
            },
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RegistrarConfig {
    /// Load configuration from defaults, optional TOML file, and environment
    ///
    /// A bare `DATABASE_URL` environment variable overrides the configured
    /// database URL, for deploy environments that only inject that variable.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut config: Self = match path {
            Some(path) => load_from_file(path)?,
            None => load_config()?,
        };

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                config.database.url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl ConfigValidation for RegistrarConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        self.database.validate()?;
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.database.url == "sqlite::memory:" {
            warnings.push("In-memory database configured; data will not survive restarts".into());
        }
        warnings
    }
}
