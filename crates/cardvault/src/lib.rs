//! # Cardvault
//!
//! Unified API for the Cardvault system: a validated, locally-persisted
//! contact-card collection and a tier-filtered sharing-envelope protocol.
//!
//! ## Overview
//!
//! A [`Vault`] brings the card store and the share protocol together over
//! one storage collaborator. The workflow:
//!
//! 1. Maintain cards in the store ([`Vault::store`]): transactional CRUD,
//!    search, statistics.
//! 2. Share a reduced view: pick a card and a [`SharingLevel`], get QR
//!    payload text or a short-lived link ([`Vault::share_qr`],
//!    [`Vault::share_link`]).
//! 3. Receive: unpack scanned or resolved payloads back into cards
//!    ([`Vault::receive`], [`Vault::receive_and_save`]).
//!
//! Field redaction happens before encryption on the sender side, so no
//! server or receiver is ever trusted with the unfiltered record.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cardvault::{Vault, VaultConfig};
//! use cardvault_core::{Card, SharingLevel};
//! use cardvault_share::EnvelopeKey;
//! use cardvault_store::SqliteStorage;
//!
//! async fn example() {
//!     let storage = Arc::new(SqliteStorage::open("vault.db").unwrap());
//!     let vault = Vault::open(EnvelopeKey::generate(), storage, VaultConfig::default()).await;
//!
//!     let card = vault.store().create(Card::new("Ada Lovelace")).await.unwrap();
//!     let qr_text = vault.share_qr(card.id, SharingLevel::Professional).await.unwrap();
//!     let matrix = cardvault_share::qr_matrix(&qr_text).unwrap();
//!     let _ = matrix;
//! }
//! ```

pub mod error;
pub mod vault;

pub use error::{Result, VaultError};
pub use vault::{Vault, VaultConfig};

// Re-export the crates a host application needs to drive a Vault.
pub use cardvault_core::{
    filter, validate_card, Card, CardField, CardId, Proficiency, ShareId, SharingLevel,
    SharingPreferences, Skill,
};
pub use cardvault_share::{
    CaptureGate, CapturePermission, EnvelopeKey, ScanSession, ScanStart, ScanState,
    ShareConfig, ShareError, ShareProtocol,
};
pub use cardvault_store::{
    CardStatistics, CardStore, MemoryStorage, SqliteStorage, Storage, StoreError,
};
