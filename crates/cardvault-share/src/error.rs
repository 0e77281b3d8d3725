//! Error types for the sharing protocol.

use thiserror::Error;

use cardvault_core::ShareId;
use cardvault_store::StorageError;

/// Errors from sharing-envelope operations.
///
/// Callers branch on the variant. `Decryption` deliberately carries no
/// detail: corruption and tampering must be indistinguishable to the
/// caller.
#[derive(Debug, Error)]
pub enum ShareError {
    /// Transport text or envelope structure could not be decoded.
    #[error("invalid share format: {0}")]
    InvalidFormat(String),

    /// The cipher rejected the ciphertext.
    #[error("decryption failed")]
    Decryption,

    /// The envelope's expiration time has passed.
    #[error("share has expired")]
    Expired,

    /// The envelope's usage ceiling has been reached.
    #[error("share usage limit exceeded")]
    UsageExceeded,

    /// No stored envelope under the share id.
    #[error("share not found: {0}")]
    ShareNotFound(ShareId),

    /// A capture session is already running.
    #[error("a scan is already in progress")]
    AlreadyScanning,

    /// No capture session is running.
    #[error("no scan in progress")]
    NotScanning,

    /// Capture permission was denied or restricted.
    #[error("camera permission denied")]
    PermissionDenied,

    /// Envelope serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Sealing failed while building an envelope.
    #[error("seal error: {0}")]
    Seal(String),

    /// QR matrix encoding failed (payload too large for the symbol).
    #[error("QR encoding error: {0}")]
    Qr(String),

    /// The persistence collaborator failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for sharing operations.
pub type Result<T> = std::result::Result<T, ShareError>;
