//! Persistence layer for the membership registrar.
//!
//! Owns the SQLite connection pool, the idempotent schema bootstrap, and the
//! low-level member queries the registry builds on.

pub mod member_store;

pub use member_store::{HealthProbe, Member, MemberStore, NewMember};
