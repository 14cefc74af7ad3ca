//! # Membership Registrar
//!
//! Issues unique membership codes and manages member records for an
//! organization's registration process. The core is the [`registry`] module:
//! code allocation, registration, credential verification, and whitelisted
//! record updates backed by a SQLite store.

pub mod api;
pub mod config;
pub mod persistence;
pub mod registry;

pub use config::RegistrarConfig;
pub use persistence::MemberStore;
pub use registry::MemberRegistry;
