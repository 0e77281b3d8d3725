//! # Cardvault Store
//!
//! Persistence for Cardvault: an opaque key/value storage collaborator and
//! the authoritative [`CardStore`] built on top of it.
//!
//! ## Overview
//!
//! Storage is abstracted behind the [`Storage`] trait so the store is
//! backend-agnostic. The primary implementation is [`SqliteStorage`], with
//! [`MemoryStorage`] for tests. The [`CardStore`] holds the in-memory card
//! collection and keeps it and its persisted form from ever diverging
//! after a completed public operation: every mutation either persists or
//! rolls back.
//!
//! ## Key Types
//!
//! - [`Storage`] - The async key/value collaborator contract
//! - [`SqliteStorage`] - SQLite-backed persistent storage
//! - [`MemoryStorage`] - In-memory storage for tests
//! - [`CardStore`] - The authoritative collection with transactional CRUD
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cardvault_core::Card;
//! use cardvault_store::{CardStore, SqliteStorage};
//!
//! async fn example() {
//!     let storage = Arc::new(SqliteStorage::open("vault.db").unwrap());
//!     let store = CardStore::load(storage).await;
//!
//!     let card = store.create(Card::new("Ada Lovelace")).await.unwrap();
//!     assert_eq!(store.get(card.id).await.unwrap(), card);
//! }
//! ```

pub mod encode;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod store;
pub mod traits;

pub use encode::{decode_cards, encode_cards};
pub use error::{Result, StorageError, StoreError};
pub use memory::{FailingStorage, MemoryStorage};
pub use sqlite::SqliteStorage;
pub use store::{CardStatistics, CardStore};
pub use traits::{Storage, CARDS_KEY};
