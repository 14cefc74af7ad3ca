//! # Configuration Abstractions
//!
//! Layered configuration loading and shared configuration types used by the
//! registrar service.

pub mod loader;
pub mod types;

// Re-export commonly used types
pub use loader::*;
pub use types::*;
