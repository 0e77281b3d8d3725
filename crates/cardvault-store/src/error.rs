//! Error types for the store module.

use thiserror::Error;

use cardvault_core::{CardId, ValidationError};

/// Errors from the persistence collaborator.
///
/// `NotFound` is load-specific and deliberately distinguishable: a missing
/// key means "nothing persisted yet", which callers treat as empty rather
/// than broken.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No value stored under the key.
    #[error("key not found: {0}")]
    NotFound(String),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Payload serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend failed for another reason (used by test doubles).
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Whether this is the benign "nothing stored yet" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Errors from public CardStore operations.
///
/// Every mutation failure leaves the in-memory collection identical to its
/// pre-call state; `Storage` here always means "already rolled back".
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input card failed validation; caller must correct and resubmit.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No card with the given id.
    #[error("card not found: {0}")]
    NotFound(CardId),

    /// The persistence collaborator failed; in-memory state was rolled back.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
