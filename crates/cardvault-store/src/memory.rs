//! In-memory implementation of the Storage trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite but
//! keeps everything in memory with no persistence. `FailingStorage` wraps
//! it to inject backend failures for rollback and cleanup tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;
use crate::traits::Storage;

/// In-memory storage implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStorage {
    /// Create a new empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().unwrap().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Bytes, StorageError> {
        let values = self.values.read().unwrap();
        values
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn save(&self, key: &str, value: Bytes) -> Result<(), StorageError> {
        let mut values = self.values.write().unwrap();
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().unwrap();
        values.remove(key);
        Ok(())
    }
}

/// Storage wrapper that can be told to fail on demand.
///
/// Saves, loads, and deletes each have an independent failure switch.
/// Used to exercise the rollback guarantee in store tests and cleanup
/// error paths in share tests.
#[derive(Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_next_save: AtomicBool,
    fail_all_loads: AtomicBool,
    fail_all_deletes: AtomicBool,
}

impl FailingStorage {
    /// Create a new wrapper over an empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `save` call fail with a backend error.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// Make every `load` call fail with a backend error (not NotFound).
    pub fn fail_all_loads(&self, fail: bool) {
        self.fail_all_loads.store(fail, Ordering::SeqCst);
    }

    /// Make every `delete` call fail with a backend error.
    pub fn fail_all_deletes(&self, fail: bool) {
        self.fail_all_deletes.store(fail, Ordering::SeqCst);
    }

    /// Access the wrapped memory store.
    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn load(&self, key: &str) -> Result<Bytes, StorageError> {
        if self.fail_all_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("injected load failure".into()));
        }
        self.inner.load(key).await
    }

    async fn save(&self, key: &str, value: Bytes) -> Result<(), StorageError> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Backend("injected save failure".into()));
        }
        self.inner.save(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_all_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("injected delete failure".into()));
        }
        self.inner.delete(key).await
    }
}
