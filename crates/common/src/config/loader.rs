//! # Configuration Loader
//!
//! Figment-based configuration loading with layered support:
//! 1. Compiled defaults
//! 2. Configuration file (TOML)
//! 3. Environment variable overrides
//!
//! Environment variables use the `ESA_` prefix with double underscores for
//! nested fields, e.g. `ESA_DATABASE__URL`.

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default configuration file name
const DEFAULT_CONFIG_FILE: &str = "registrar.toml";

/// Environment variable prefix for the registry
const DEFAULT_ENV_PREFIX: &str = "ESA";

/// Load configuration with the default layered approach
///
/// # Configuration Layer Priority (highest to lowest)
/// 1. Environment variables (ESA_*)
/// 2. Configuration file (registrar.toml or ESA_CONFIG_PATH)
/// 3. Compiled defaults
pub fn load_config<T>() -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    load_config_with_options::<T>(LoadOptions::default())
}

/// Load configuration from a specific file, with environment overrides
pub fn load_from_file<T>(path: &Path) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    let options = LoadOptions {
        config_path: Some(path.to_path_buf()),
        env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        require_file: true,
    };
    load_config_with_options::<T>(options)
}

/// Configuration loading options
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Optional path to configuration file
    pub config_path: Option<PathBuf>,
    /// Environment variable prefix
    pub env_prefix: String,
    /// Whether the configuration file is required
    pub require_file: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            require_file: false,
        }
    }
}

/// Load configuration with custom options
pub fn load_config_with_options<T>(options: LoadOptions) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    debug!("Loading configuration with options: {:?}", options);

    // Start with compiled defaults
    let mut figment = Figment::new().merge(Serialized::defaults(T::default()));

    // Determine configuration file path
    let config_path = determine_config_path(options.config_path)?;

    if let Some(path) = &config_path {
        if path.exists() {
            info!("Loading configuration from file: {}", path.display());
            figment = figment.merge(Toml::file(path));
        } else if options.require_file {
            return Err(ConfigurationError::FileNotFound {
                path: path.display().to_string(),
            });
        } else {
            warn!(
                "Configuration file not found: {} (using defaults)",
                path.display()
            );
        }
    }

    // Add environment variable overrides
    figment = figment.merge(
        Env::prefixed(&format!("{}_", options.env_prefix))
            .split("__")
            .ignore(&["PATH", "HOME", "USER"]),
    );

    let config: T = figment
        .extract()
        .map_err(|err| ConfigurationError::ParseError {
            details: format!("Failed to parse configuration: {err}"),
        })?;

    debug!(
        "Configuration loaded from {} sources",
        figment.metadata().count()
    );

    Ok(config)
}

/// Determine configuration file path with fallback logic
fn determine_config_path(
    override_path: Option<PathBuf>,
) -> Result<Option<PathBuf>, ConfigurationError> {
    if let Some(path) = override_path {
        return Ok(Some(path));
    }

    // Check environment variable for config path
    if let Ok(env_path) = std::env::var("ESA_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        debug!("Using config path from environment: {}", path.display());
        return Ok(Some(path));
    }

    // Check current directory
    let current_dir_config = std::env::current_dir()
        .map_err(|e| ConfigurationError::EnvironmentError {
            var: "current_dir".to_string(),
            details: e.to_string(),
        })?
        .join(DEFAULT_CONFIG_FILE);

    if current_dir_config.exists() {
        debug!(
            "Found config file in current directory: {}",
            current_dir_config.display()
        );
        return Ok(Some(current_dir_config));
    }

    debug!("No configuration file found, using defaults");
    Ok(None)
}
