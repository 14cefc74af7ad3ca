//! # Common
//!
//! Shared configuration and error infrastructure for the membership registry.
//! This crate provides the building blocks the service crates depend on:
//! - Layered configuration loading (defaults, TOML file, environment)
//! - Shared configuration types with validation
//! - Error handling infrastructure with the `RegistryBaseError` trait
//!
//! ## Design Principles
//! - Minimal dependencies to avoid bloat in dependent crates
//! - Use thiserror for library errors, anyhow for application errors
//! - Serde support on all configuration types

pub mod config;
pub mod error;

// Re-export commonly used types at the crate root for convenience
pub use config::*;
pub use error::*;

/// Version of the common crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
