//! Error types for ingestion, storage and snapshot reads
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Top-level ingestion error, surfaced to the scheduler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Missing required configuration. Fatal to this attempt only.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream failed or returned nothing usable. Transient.
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Payload shape cannot be canonicalized. Permanent for this response.
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] CanonicalError),

    /// Blob or pointer write failed. Prior latest pointer is intact.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Upstream fetch errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("Upstream request failed with {status}")]
    Status { status: u16 },

    #[error("Upstream transport failure: {0}")]
    Transport(String),

    #[error("Upstream payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Upstream payload is empty")]
    EmptyPayload,
}

/// Canonicalization errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanonicalError {
    #[error("Payload is empty")]
    Empty,

    #[error("Payload must be a JSON object or array, got {0}")]
    NotStructured(&'static str),
}

/// Blob and pointer store errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Snapshot read errors
///
/// "Nothing published yet" and "pointer without blob" are not errors; the
/// reader reports them as absence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Corrupt pointer record: {0}")]
    CorruptPointer(String),

    #[error("Corrupt snapshot blob {key}: {reason}")]
    CorruptBlob { key: String, reason: String },
}

/// Local dataset parse errors. Never escape the resilient cache.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Missing CSV headers")]
    MissingHeaders,

    #[error("CSV header has no value column")]
    MissingValueColumn,

    #[error("Dataset source unavailable: {0}")]
    Source(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_display() {
        let err = UpstreamError::Status { status: 503 };
        assert_eq!(err.to_string(), "Upstream request failed with 503");
    }

    #[test]
    fn test_ingest_error_from_storage_error() {
        let storage_err = StorageError::Backend("bucket unavailable".to_string());
        let ingest_err: IngestError = storage_err.into();
        assert!(matches!(ingest_err, IngestError::Storage(_)));
        assert!(ingest_err.to_string().contains("bucket unavailable"));
    }

    #[test]
    fn test_ingest_error_from_canonical_error() {
        let ingest_err: IngestError = CanonicalError::NotStructured("number").into();
        assert!(matches!(ingest_err, IngestError::InvalidPayload(_)));
        assert!(ingest_err.to_string().contains("number"));
    }

    #[test]
    fn test_storage_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
