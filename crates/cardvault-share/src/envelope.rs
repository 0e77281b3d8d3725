//! The sharing envelope: the package that crosses the trust boundary.
//!
//! An envelope holds an already-filtered card snapshot plus expiry and
//! usage policy. It is wire-only: never stored in the authoritative card
//! collection, and a receiver never sees anything the filter removed.

use serde::{Deserialize, Serialize};

use cardvault_core::{Card, ShareId, SharingLevel};

use crate::error::{Result, ShareError};

/// A shareable envelope. Field names on the wire follow the cross-platform
/// payload shape (camelCase keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharingEnvelope {
    /// The filtered card snapshot. Filtering happened at build time.
    #[serde(rename = "businessCard")]
    pub card: Card,

    /// The tier the snapshot was produced with.
    #[serde(rename = "sharingLevel")]
    pub level: SharingLevel,

    /// Absolute expiration, Unix milliseconds.
    #[serde(rename = "expirationDate")]
    pub expires_at: i64,

    /// Globally unique share identifier.
    #[serde(rename = "shareId")]
    pub share_id: ShareId,

    /// Creation time, Unix milliseconds.
    #[serde(rename = "createdAt")]
    pub created_at: i64,

    /// Maximum permitted uses. None for unlimited (QR shares).
    #[serde(rename = "maxUses", default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,

    /// Uses consumed so far. None when no limit is set.
    #[serde(
        rename = "currentUses",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_uses: Option<u32>,
}

impl SharingEnvelope {
    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| ShareError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| ShareError::InvalidFormat(e.to_string()))
    }

    /// Enforce expiry and usage policy at `now`.
    ///
    /// Expiry is checked strictly before usage accounting.
    pub fn check_policy(&self, now: i64) -> Result<()> {
        if now > self.expires_at {
            return Err(ShareError::Expired);
        }
        if let (Some(max), Some(current)) = (self.max_uses, self.current_uses) {
            if current >= max {
                return Err(ShareError::UsageExceeded);
            }
        }
        Ok(())
    }

    /// Record one use. No-op when no limit is set.
    pub fn record_use(&mut self) {
        if let Some(current) = self.current_uses.as_mut() {
            *current += 1;
        }
    }

    /// Whether the usage ceiling has been reached.
    pub fn exhausted(&self) -> bool {
        matches!(
            (self.max_uses, self.current_uses),
            (Some(max), Some(current)) if current >= max
        )
    }
}
