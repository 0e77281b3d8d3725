//! Envelope cipher: authenticated symmetric encryption for share payloads.
//!
//! ChaCha20-Poly1305 with a random 96-bit nonce per seal. Any bit-level
//! tampering with the ciphertext makes `open` fail; it never silently
//! decodes different content.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShareError};

/// A 256-bit symmetric key for sealing envelopes.
#[derive(Clone)]
pub struct EnvelopeKey([u8; 32]);

impl EnvelopeKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive an envelope key from device key material.
    ///
    /// Blake3 derive_key with a fixed domain string, so the same device
    /// secret never yields the same key for a different purpose.
    pub fn derive(device_secret: &[u8], context: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new_derive_key("cardvault-share-v0-envelope");
        hasher.update(device_secret);
        hasher.update(context);
        Self(*hasher.finalize().as_bytes())
    }

    fn encrypt(&self, plaintext: &[u8], nonce: &EnvelopeNonce) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| ShareError::Seal(e.to_string()))?;
        cipher
            .encrypt(Nonce::from_slice(&nonce.0), plaintext)
            .map_err(|e| ShareError::Seal(e.to_string()))
    }

    fn decrypt(&self, ciphertext: &[u8], nonce: &EnvelopeNonce) -> Result<Vec<u8>> {
        let cipher =
            ChaCha20Poly1305::new_from_slice(&self.0).map_err(|_| ShareError::Decryption)?;
        cipher
            .decrypt(Nonce::from_slice(&nonce.0), ciphertext)
            .map_err(|_| ShareError::Decryption)
    }
}

/// A 96-bit nonce for ChaCha20-Poly1305.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeNonce(pub [u8; 12]);

impl EnvelopeNonce {
    /// Generate a new random nonce.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 12];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

/// Cipher format identifier for sealed envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SealFormat {
    /// ChaCha20-Poly1305 with 256-bit key.
    ChaCha20Poly1305 = 1,
}

/// A sealed (encrypted) envelope: ciphertext plus the metadata needed to
/// open it, assuming the recipient has the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    /// Cipher used.
    pub format: SealFormat,

    /// Nonce used for this seal (unique per seal).
    pub nonce: EnvelopeNonce,

    /// The encrypted data (includes the authentication tag).
    pub ciphertext: Vec<u8>,
}

impl SealedEnvelope {
    /// Seal plaintext with the given key.
    pub fn seal(plaintext: &[u8], key: &EnvelopeKey) -> Result<Self> {
        let nonce = EnvelopeNonce::generate();
        let ciphertext = key.encrypt(plaintext, &nonce)?;

        Ok(Self {
            format: SealFormat::ChaCha20Poly1305,
            nonce,
            ciphertext,
        })
    }

    /// Open with the given key.
    pub fn open(&self, key: &EnvelopeKey) -> Result<Vec<u8>> {
        match self.format {
            SealFormat::ChaCha20Poly1305 => key.decrypt(&self.ciphertext, &self.nonce),
        }
    }

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
}
