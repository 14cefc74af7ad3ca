//! Route handlers for the registrar API

pub mod health;
pub mod members;

#[cfg(test)]
mod members_test;

pub use health::*;
pub use members::*;
