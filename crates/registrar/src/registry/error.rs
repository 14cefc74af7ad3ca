//! Registry operation errors

use common::error::RegistryBaseError;
use thiserror::Error;

/// Errors surfaced by registry operations
///
/// Credential failures are deliberately generic: no variant distinguishes an
/// unknown identifier from a wrong code, so callers cannot enumerate
/// registered identifiers.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Email or phone already claimed; carries the existing record's code so
    /// a duplicate submission can recover it
    #[error("Email or phone number already registered")]
    DuplicateContact { existing_code: String },

    /// Identifier/code pair did not resolve a record
    #[error("Invalid credentials. Please check your email/phone and membership code")]
    InvalidCredential,

    /// Column outside the update whitelist; rejected before any store access
    #[error("Invalid column name: {column}")]
    InvalidColumn { column: String },

    /// Target email/phone already used by a different record
    #[error("This {field} is already registered to another member")]
    ConflictingField { field: &'static str },

    /// Locator did not resolve a record
    #[error("Member not found or invalid membership code")]
    NotFound,

    /// Required registration input absent or empty
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// Underlying store failure; the operation was aborted with no partial
    /// writes retained
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl RegistryBaseError for RegistryError {}
