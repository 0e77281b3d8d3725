//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use cardvault_core::{Card, Proficiency, Skill};
use cardvault_share::{EnvelopeKey, ShareConfig, ShareProtocol};
use cardvault_store::{FailingStorage, MemoryStorage};

/// A test fixture with an envelope key and shared storage.
pub struct TestFixture {
    pub key: EnvelopeKey,
    pub storage: Arc<MemoryStorage>,
}

impl TestFixture {
    /// Create a fixture with a random key and empty storage.
    pub fn new() -> Self {
        Self {
            key: EnvelopeKey::generate(),
            storage: Arc::new(MemoryStorage::new()),
        }
    }

    /// Create with a deterministic key derived from a seed.
    pub fn with_seed(seed: &[u8]) -> Self {
        Self {
            key: EnvelopeKey::derive(seed, b"testkit"),
            storage: Arc::new(MemoryStorage::new()),
        }
    }

    /// A share protocol over this fixture's key and storage.
    pub fn protocol(&self) -> ShareProtocol {
        ShareProtocol::new(self.key.clone(), self.storage.clone(), ShareConfig::default())
    }

    /// A fully-populated card with every addressable field set.
    pub fn full_card(&self, name: &str) -> Card {
        let mut card = Card::new(name)
            .with_title("Engineer")
            .with_company("Cardvault")
            .with_email(format!("{}@example.com", slug(name)))
            .with_phone("+1 555 010 0100")
            .with_skill(Skill::new("Rust", "Languages", Proficiency::Expert))
            .with_skill(Skill::new("SQL", "Databases", Proficiency::Intermediate))
            .with_category("colleagues");
        card.image = Some(bytes_for_image());
        card
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixture whose storage can be told to fail, for rollback tests.
pub struct FailingFixture {
    pub key: EnvelopeKey,
    pub storage: Arc<FailingStorage>,
}

impl FailingFixture {
    /// Create a fixture over fail-injectable storage.
    pub fn new() -> Self {
        Self {
            key: EnvelopeKey::generate(),
            storage: Arc::new(FailingStorage::new()),
        }
    }
}

impl Default for FailingFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', ".")
}

fn bytes_for_image() -> bytes::Bytes {
    // A 1x1 PNG header stub; content is irrelevant, the core treats it as
    // opaque bytes.
    bytes::Bytes::from_static(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])
}
