//! Error type for the unified Vault API.

use thiserror::Error;

use cardvault_share::ShareError;
use cardvault_store::StoreError;

/// Errors surfaced by [`crate::Vault`] operations.
///
/// A thin union over the store and share taxonomies; callers that need to
/// branch on the precise kind match through to the inner variant.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Card store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Sharing operation failed.
    #[error(transparent)]
    Share(#[from] ShareError),
}

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
