//! In-memory stores
//!
//! Map-backed implementations of [`BlobStore`] and [`PointerStore`] used as
//! test fakes. Both can be told to fail reads or writes so that partial
//! failure paths of the ingestion pipeline can be exercised.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use types::errors::StorageError;

use super::{BlobStore, PointerStore, StoredBlob};

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Backend("store lock poisoned".to_string())
}

/// In-memory object storage.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Delete a blob, as an external retention policy would.
    pub fn remove(&self, key: &str) -> Option<StoredBlob> {
        self.blobs.write().ok()?.remove(key)
    }

    /// Stored keys in ascending order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .blobs
            .read()
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.blobs.read().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("injected write failure for {}", key)));
        }

        let blob = StoredBlob {
            body,
            content_type: Some(content_type.to_string()),
        };
        self.blobs
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), blob);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredBlob>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("injected read failure for {}", key)));
        }

        Ok(self.blobs.read().map_err(poisoned)?.get(key).cloned())
    }
}

/// In-memory key/value store.
#[derive(Debug, Default)]
pub struct MemoryPointerStore {
    records: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryPointerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Write a raw record directly, bypassing fault injection.
    pub fn insert_raw(&self, name: &str, value: &str) {
        if let Ok(mut records) = self.records.write() {
            records.insert(name.to_string(), value.to_string());
        }
    }
}

#[async_trait]
impl PointerStore for MemoryPointerStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("injected read failure for {}", name)));
        }

        Ok(self.records.read().map_err(poisoned)?.get(name).cloned())
    }

    async fn put(&self, name: &str, value: String) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("injected write failure for {}", name)));
        }

        self.records
            .write()
            .map_err(poisoned)?
            .insert(name.to_string(), value);
        Ok(())
    }
}
