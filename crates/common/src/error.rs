//! Error handling infrastructure for the membership registry
//!
//! This module defines the error handling conventions used throughout the
//! workspace:
//! - `RegistryBaseError` trait for consistent error handling
//! - `ConfigurationError` for configuration loading and validation
//!
//! # Design Principles
//! - All errors implement Send + Sync for async compatibility
//! - Use thiserror for library errors, anyhow for application errors
//! - Provide clear, actionable error messages

use thiserror::Error;

/// Base trait for all registry-specific errors
///
/// Ensures every error type in the workspace is:
/// - Thread-safe (Send + Sync)
/// - Static lifetime (no borrowed data)
/// - Implements the standard Error trait
pub trait RegistryBaseError: std::error::Error + Send + Sync + 'static {}

/// Configuration-related errors
///
/// These errors occur during configuration loading, parsing, or validation.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    /// Environment variable error
    #[error("Environment variable error for {var}: {details}")]
    EnvironmentError { var: String, details: String },
}

impl RegistryBaseError for ConfigurationError {}

impl ConfigurationError {
    /// Create a parse error from any displayable source
    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::ParseError {
            details: details.into(),
        }
    }
}
