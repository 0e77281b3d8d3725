//! # Cardvault Share
//!
//! The sharing-envelope protocol: package a tier-filtered card snapshot
//! into a tamper-resistant, time- and use-limited envelope that travels
//! out-of-band as a QR code or a short-lived link.
//!
//! ## Overview
//!
//! Filtering happens on the sender side, before serialization; a receiver
//! only ever holds the reduced snapshot, so a compromised consumer cannot
//! recover hidden fields from protocol internals. Envelopes are sealed
//! with ChaCha20-Poly1305: any bit-level tampering fails the open, and the
//! failure is indistinguishable from corruption.
//!
//! ## Key Types
//!
//! - [`ShareProtocol`] - build_qr / build_link / unpack / resolve_link
//! - [`SharingEnvelope`] - the wire-only package with expiry and usage policy
//! - [`SealedEnvelope`] / [`EnvelopeKey`] - the cipher collaborator
//! - [`ScanSession`] - single-occupancy capture state machine
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cardvault_core::{Card, SharingLevel};
//! use cardvault_share::{EnvelopeKey, ShareConfig, ShareProtocol};
//! use cardvault_store::MemoryStorage;
//!
//! let protocol = ShareProtocol::new(
//!     EnvelopeKey::generate(),
//!     Arc::new(MemoryStorage::new()),
//!     ShareConfig::default(),
//! );
//!
//! let card = Card::new("Ada Lovelace");
//! let text = protocol.build_qr(&card, SharingLevel::Public, None).unwrap();
//! let matrix = cardvault_share::qr_matrix(&text).unwrap();
//! let received = protocol.unpack(&text).unwrap();
//! ```

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod protocol;
pub mod qr;
pub mod scan;

pub use crypto::{EnvelopeKey, EnvelopeNonce, SealFormat, SealedEnvelope};
pub use envelope::SharingEnvelope;
pub use error::{Result, ShareError};
pub use protocol::{ShareConfig, ShareProtocol, LINK_TTL_MS, QR_TTL_MS};
pub use qr::qr_matrix;
pub use scan::{CaptureGate, CapturePermission, ScanSession, ScanStart, ScanState};
