//! Collection codec: card collection <-> CBOR bytes.
//!
//! The whole collection is one value under one key; every save rewrites it.
//! CBOR keeps image bytes compact and needs no text escaping.

use bytes::Bytes;

use cardvault_core::Card;

use crate::error::StorageError;

/// Encode the full card collection to CBOR bytes.
pub fn encode_cards(cards: &[Card]) -> Result<Bytes, StorageError> {
    let mut buf = Vec::new();
    ciborium::into_writer(&cards, &mut buf)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(Bytes::from(buf))
}

/// Decode a card collection from CBOR bytes.
pub fn decode_cards(bytes: &[u8]) -> Result<Vec<Card>, StorageError> {
    ciborium::from_reader(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
}
