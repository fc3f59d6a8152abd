//! Filesystem-backed stores
//!
//! Durable backends for single-node deployments. Every write goes to a
//! temporary file, is fsynced, then renamed over the target, so readers see
//! either the old file or the complete new one.
//!
//! Layout under a blob root:
//! - `<key>`: body
//! - `<key>.content-type`: recorded content type (written before the body)

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use types::errors::StorageError;
use uuid::Uuid;

use super::{validate_key, BlobStore, PointerStore, StoredBlob};

const CONTENT_TYPE_SUFFIX: &str = ".content-type";
const TMP_SUFFIX: &str = ".tmp";

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Atomic write: write to tmp, fsync, rename.
///
/// Each call gets its own tmp file next to the target, so overlapping
/// writes to one path never share a file and the last rename wins.
async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let tmp_path = with_suffix(path, &format!(".{}{}", Uuid::now_v7().simple(), TMP_SUFFIX));
    let result = write_then_rename(&tmp_path, path, data).await;
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path).await;
    }
    result
}

async fn write_then_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> Result<(), StorageError> {
    {
        let mut file = fs::File::create(tmp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
    }
    fs::rename(tmp_path, path).await?;
    Ok(())
}

/// Read a file, mapping "not found" to `None`.
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match fs::read(path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Object storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        write_atomic(&with_suffix(&path, CONTENT_TYPE_SUFFIX), content_type.as_bytes()).await?;
        write_atomic(&path, &body).await?;

        debug!(key, size = body.len(), path = %path.display(), "Blob written");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredBlob>, StorageError> {
        let path = self.path_for(key)?;

        let Some(body) = read_optional(&path).await? else {
            return Ok(None);
        };
        let content_type = read_optional(&with_suffix(&path, CONTENT_TYPE_SUFFIX))
            .await?
            .map(|raw| String::from_utf8_lossy(&raw).into_owned());

        Ok(Some(StoredBlob { body, content_type }))
    }
}

/// Key/value records stored one file per name.
#[derive(Debug, Clone)]
pub struct FsPointerStore {
    root: PathBuf,
}

impl FsPointerStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PointerStore for FsPointerStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        validate_key(name)?;
        let raw = read_optional(&self.root.join(name)).await?;

        raw.map(|bytes| {
            String::from_utf8(bytes)
                .map_err(|e| StorageError::Backend(format!("record {} is not UTF-8: {}", name, e)))
        })
        .transpose()
    }

    async fn put(&self, name: &str, value: String) -> Result<(), StorageError> {
        validate_key(name)?;
        write_atomic(&self.root.join(name), value.as_bytes()).await?;

        debug!(name, "Pointer record written");
        Ok(())
    }
}
