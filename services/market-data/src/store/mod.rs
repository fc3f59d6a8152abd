//! Snapshot and pointer storage
//!
//! Two stores, each passed explicitly into the operations that use them:
//! - [`BlobStore`]: append-only object storage for immutable snapshot bodies
//! - [`PointerStore`]: small key/value store holding the latest pointer
//!
//! Backends:
//! - `memory`: in-process maps with write-fault injection, for tests
//! - `fs`: durable filesystem storage with atomic writes

use async_trait::async_trait;
use types::errors::StorageError;

pub mod fs;
pub mod memory;

pub use fs::{FsBlobStore, FsPointerStore};
pub use memory::{MemoryBlobStore, MemoryPointerStore};

/// A stored blob body with its recorded content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl StoredBlob {
    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}

/// Object storage for snapshot bodies.
///
/// Keys are written once; a changed payload always produces a new key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` under `key`. Returns only after the write is durable
    /// for the backend.
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Fetch the blob at `key`. Returns `None` if no such blob exists.
    async fn get(&self, key: &str) -> Result<Option<StoredBlob>, StorageError>;
}

/// Key/value store for the latest pointer record.
#[async_trait]
pub trait PointerStore: Send + Sync {
    /// Read a record. Returns `None` if it has never been written.
    async fn get(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a record with a single write.
    async fn put(&self, name: &str, value: String) -> Result<(), StorageError>;
}

/// Reject keys that could escape a store root.
///
/// Keys are `/`-separated relative paths with no empty, `.` or `..`
/// segments and no backslashes.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");

    if invalid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
