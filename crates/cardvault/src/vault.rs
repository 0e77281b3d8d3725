//! The Vault: unified API over the card store and the share protocol.
//!
//! One Vault is constructed at process start and passed by handle to
//! callers; there is no ambient global instance. Store and protocol share
//! the same storage collaborator.

use std::sync::Arc;

use tracing::info;
use url::Url;

use cardvault_core::{Card, CardId, SharingLevel};
use cardvault_share::{
    qr_matrix, CaptureGate, EnvelopeKey, ScanSession, ShareConfig, ShareProtocol,
};
use cardvault_store::{CardStatistics, CardStore, Storage};

use crate::error::Result;

/// Configuration for a Vault instance.
#[derive(Debug, Clone, Default)]
pub struct VaultConfig {
    /// Share protocol settings (base URL, envelope lifetimes).
    pub share: ShareConfig,
}

/// The main Vault struct.
///
/// Provides a unified API for:
/// - Maintaining the validated card collection
/// - Building QR and link shares from stored cards
/// - Unpacking received shares
pub struct Vault {
    store: CardStore,
    share: Arc<ShareProtocol>,
}

impl Vault {
    /// Open a vault: load the card collection and wire up the share
    /// protocol over the same storage collaborator.
    pub async fn open(
        key: EnvelopeKey,
        storage: Arc<dyn Storage>,
        config: VaultConfig,
    ) -> Self {
        let store = CardStore::load(storage.clone()).await;
        let share = Arc::new(ShareProtocol::new(key, storage, config.share));

        if let Some(error) = store.load_error() {
            info!(%error, "vault opened with an unreadable card collection");
        }
        Self { store, share }
    }

    /// The card store.
    pub fn store(&self) -> &CardStore {
        &self.store
    }

    /// The share protocol.
    pub fn share(&self) -> &ShareProtocol {
        &self.share
    }

    /// Build a QR share payload for a stored card.
    pub async fn share_qr(&self, id: CardId, level: SharingLevel) -> Result<String> {
        let card = self.store.get(id).await?;
        Ok(self.share.build_qr(&card, level, None)?)
    }

    /// Build the QR module matrix for a stored card, ready to render.
    pub async fn share_qr_matrix(
        &self,
        id: CardId,
        level: SharingLevel,
    ) -> Result<Vec<Vec<bool>>> {
        let text = self.share_qr(id, level).await?;
        Ok(qr_matrix(&text)?)
    }

    /// Build a usage-limited share link for a stored card.
    pub async fn share_link(
        &self,
        id: CardId,
        level: SharingLevel,
        max_uses: u32,
    ) -> Result<Url> {
        let card = self.store.get(id).await?;
        Ok(self.share.build_link(&card, level, max_uses).await?)
    }

    /// Unpack received share text into the filtered card it carries.
    pub fn receive(&self, transport_text: &str) -> Result<Card> {
        Ok(self.share.unpack(transport_text)?)
    }

    /// Unpack a received share and persist it as a new contact.
    ///
    /// The received snapshot keeps its identity but gets this device's
    /// clock for its timestamps.
    pub async fn receive_and_save(&self, transport_text: &str) -> Result<Card> {
        let mut card = self.share.unpack(transport_text)?;
        let now = cardvault_core::now_millis();
        card.created_at = now;
        card.updated_at = now;
        Ok(self.store.create(card).await?)
    }

    /// Create a scan session bound to this vault's protocol.
    pub fn scan_session(&self, gate: Box<dyn CaptureGate>) -> ScanSession {
        ScanSession::new(self.share.clone(), gate)
    }

    /// Aggregate statistics over the stored collection.
    pub async fn statistics(&self) -> CardStatistics {
        self.store.statistics().await
    }
}
