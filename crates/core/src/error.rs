//! Error types for stockroom
//!
//! This module defines the error taxonomy shared by every layer.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Absence of a record is never an error: lookups return `Option` and deletes
//! return `bool`. Everything here is a failure the caller has to act on.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for stockroom operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Error types for the stockroom engine
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file could not be opened, written, or locked in time
    #[error("Storage unavailable at {}: {reason}", path.display())]
    StorageUnavailable {
        /// Backing file path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Document could not be parsed or does not have the expected shape
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    /// Sort or filter field unknown for the collection
    #[error("Invalid query field '{field}' for collection '{collection}'")]
    InvalidQueryField {
        /// Collection the query ran against
        collection: String,
        /// Field name supplied by the caller
        field: String,
    },

    /// Caller input failed a shape constraint
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be read or parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Caller cancelled the operation before it persisted anything
    #[error("Operation cancelled")]
    Cancelled,
}

impl StoreError {
    /// Build a `StorageUnavailable` error for `path`.
    pub fn unavailable(path: &Path, reason: impl ToString) -> Self {
        StoreError::StorageUnavailable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Build a `CorruptDocument` error.
    pub fn corrupt(msg: impl Into<String>) -> Self {
        StoreError::CorruptDocument(msg.into())
    }

    /// Build an `InvalidQueryField` error.
    pub fn invalid_field(collection: &str, field: &str) -> Self {
        StoreError::InvalidQueryField {
            collection: collection.to_string(),
            field: field.to_string(),
        }
    }

    /// Build a `Validation` error.
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    /// True for failures of the backing resource itself (I/O, lock timeouts).
    pub fn is_storage(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable { .. })
    }
}
