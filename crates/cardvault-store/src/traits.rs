//! Storage trait: the abstract persistence collaborator.
//!
//! The core never talks to a concrete database. It requires an opaque
//! key/value byte store with whole-value replace-on-save semantics.
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;

/// Keys used by the card store and the share protocol.
///
/// One fixed key holds the entire card collection (whole-collection
/// replace on every save, no partial updates); link-based share envelopes
/// live under one key per share id (`share/{uuid}`).
pub const CARDS_KEY: &str = "cards";

/// The persistence collaborator: an opaque key/value byte store.
///
/// All methods are async; the SQLite backend serializes access behind a
/// mutex internally. Implementations must be safe to call concurrently.
///
/// # Contract
///
/// - `load` of an absent key returns [`StorageError::NotFound`], never an
///   empty value.
/// - `save` replaces the whole value atomically from the caller's point of
///   view: a concurrent `load` sees either the old bytes or the new bytes.
/// - `delete` of an absent key is a no-op, not an error.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the bytes stored under a key.
    async fn load(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Store bytes under a key, replacing any previous value.
    async fn save(&self, key: &str, value: Bytes) -> Result<(), StorageError>;

    /// Remove a key. Absent keys are ignored.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
