//! Share protocol: build, persist, and unpack sharing envelopes.
//!
//! QR shares are fully self-contained: the sealed envelope rides inside
//! the scanned text and nothing is stored. Link shares persist the sealed
//! envelope under the share id and put only that id in the URL.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, warn};
use url::Url;

use cardvault_core::{filter, now_millis, Card, ShareId, SharingLevel};
use cardvault_store::Storage;

use crate::crypto::{EnvelopeKey, SealedEnvelope};
use crate::envelope::SharingEnvelope;
use crate::error::{Result, ShareError};

/// Default QR share lifetime: 24 hours.
pub const QR_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Default link share lifetime: 1 hour.
pub const LINK_TTL_MS: i64 = 60 * 60 * 1000;

/// Configuration for the share protocol.
#[derive(Debug, Clone)]
pub struct ShareConfig {
    /// Base URL for link shares; the share id becomes the final path
    /// segment.
    pub base_url: Url,
    /// Lifetime of QR shares without an explicit expiration.
    pub qr_ttl_ms: i64,
    /// Lifetime of link shares.
    pub link_ttl_ms: i64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://cardvault.app/share").expect("default base url"),
            qr_ttl_ms: QR_TTL_MS,
            link_ttl_ms: LINK_TTL_MS,
        }
    }
}

/// The share protocol instance.
///
/// Constructed once at process start with the device envelope key and the
/// same storage collaborator the card store uses; passed by handle, no
/// ambient global.
pub struct ShareProtocol {
    key: EnvelopeKey,
    storage: Arc<dyn Storage>,
    config: ShareConfig,
}

impl ShareProtocol {
    /// Create a protocol instance.
    pub fn new(key: EnvelopeKey, storage: Arc<dyn Storage>, config: ShareConfig) -> Self {
        Self {
            key,
            storage,
            config,
        }
    }

    /// Build a QR share payload: filter, wrap, seal, base64.
    ///
    /// `expires_at` defaults to now + 24h. The returned text is what gets
    /// embedded in the QR matrix; no state is stored.
    pub fn build_qr(
        &self,
        card: &Card,
        level: SharingLevel,
        expires_at: Option<i64>,
    ) -> Result<String> {
        let now = now_millis();
        let envelope = SharingEnvelope {
            card: filter(card, level),
            level,
            expires_at: expires_at.unwrap_or(now + self.config.qr_ttl_ms),
            share_id: ShareId::generate(),
            created_at: now,
            max_uses: None,
            current_uses: None,
        };

        debug!(share = %envelope.share_id, %level, "built QR share");
        self.seal_to_text(&envelope)
    }

    /// Build a usage-limited link share.
    ///
    /// The sealed envelope is persisted under `share/{id}`; the returned
    /// URL carries only the share id as its final path segment.
    pub async fn build_link(
        &self,
        card: &Card,
        level: SharingLevel,
        max_uses: u32,
    ) -> Result<Url> {
        let now = now_millis();
        let envelope = SharingEnvelope {
            card: filter(card, level),
            level,
            expires_at: now + self.config.link_ttl_ms,
            share_id: ShareId::generate(),
            created_at: now,
            max_uses: Some(max_uses.max(1)),
            current_uses: Some(0),
        };

        let sealed = SealedEnvelope::seal(&envelope.to_bytes()?, &self.key)?;
        self.storage
            .save(&envelope.share_id.storage_key(), sealed.to_bytes()?.into())
            .await?;

        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ShareError::Serialization("base URL cannot be a base".into()))?
            .push(&envelope.share_id.to_string());

        debug!(share = %envelope.share_id, %level, max_uses, "built link share");
        Ok(url)
    }

    /// Unpack transport text into the filtered card it carries.
    ///
    /// Steps, in order: base64 decode, open the seal, decode the envelope,
    /// expiry check (strictly before usage accounting), usage check. Any
    /// failure yields exactly one error; a tampered payload fails at the
    /// seal, indistinguishable from corruption.
    pub fn unpack(&self, transport_text: &str) -> Result<Card> {
        let sealed_bytes = BASE64
            .decode(transport_text.trim())
            .map_err(|e| ShareError::InvalidFormat(e.to_string()))?;

        let sealed = SealedEnvelope::from_bytes(&sealed_bytes)?;
        let envelope_bytes = sealed.open(&self.key)?;
        let envelope = SharingEnvelope::from_bytes(&envelope_bytes)?;

        envelope.check_policy(now_millis())?;

        debug!(share = %envelope.share_id, level = %envelope.level, "unpacked share");
        Ok(envelope.card)
    }

    /// Resolve a link share by id: load, unpack, account one use.
    ///
    /// The stored envelope's use counter is incremented and re-sealed;
    /// once the ceiling is reached the stored envelope is removed, so a
    /// later resolve fails `ShareNotFound` rather than lingering forever.
    /// Expired envelopes are removed on sight.
    pub async fn resolve_link(&self, share_id: ShareId) -> Result<Card> {
        let key = share_id.storage_key();

        let stored = match self.storage.load(&key).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Err(ShareError::ShareNotFound(share_id)),
            Err(e) => return Err(e.into()),
        };

        let sealed = SealedEnvelope::from_bytes(&stored)?;
        let envelope_bytes = sealed.open(&self.key)?;
        let mut envelope = SharingEnvelope::from_bytes(&envelope_bytes)?;

        if let Err(e) = envelope.check_policy(now_millis()) {
            // The policy verdict wins even if cleanup fails.
            if matches!(e, ShareError::Expired) {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    warn!(share = %share_id, error = %cleanup, "expired share cleanup failed");
                }
            }
            return Err(e);
        }

        envelope.record_use();
        if envelope.exhausted() {
            self.storage.delete(&key).await?;
        } else {
            let resealed = SealedEnvelope::seal(&envelope.to_bytes()?, &self.key)?;
            self.storage.save(&key, resealed.to_bytes()?.into()).await?;
        }

        debug!(share = %share_id, uses = ?envelope.current_uses, "resolved link share");
        Ok(envelope.card)
    }

    /// Extract the share id from a share URL (the final path segment).
    pub fn share_id_from_url(url: &Url) -> Result<ShareId> {
        let segment = url
            .path_segments()
            .and_then(|mut s| s.next_back())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ShareError::InvalidFormat("share URL has no path".into()))?;

        ShareId::parse(segment).map_err(|e| ShareError::InvalidFormat(e.to_string()))
    }

    fn seal_to_text(&self, envelope: &SharingEnvelope) -> Result<String> {
        let sealed = SealedEnvelope::seal(&envelope.to_bytes()?, &self.key)?;
        Ok(BASE64.encode(sealed.to_bytes()?))
    }
}
