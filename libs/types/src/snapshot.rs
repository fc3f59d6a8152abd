//! Snapshot records
//!
//! A snapshot is one immutable, self-contained published version of the
//! upstream dataset. `SnapshotMetadata` is both the value stored under the
//! latest pointer and the header returned next to the data on reads.

use serde::{Deserialize, Serialize};

/// Name of the single pointer record identifying the current snapshot.
pub const LATEST_DATASET_KEY: &str = "latest-dataset";

/// Content type recorded for every snapshot body.
pub const SNAPSHOT_CONTENT_TYPE: &str = "application/json";

/// Metadata describing one published snapshot.
///
/// Invariants:
/// - `checksum` is the SHA-256 of the canonical body stored at `key`
/// - `key` is derived from `date` and `checksum` only
///
/// Serialized field names are camelCase; this is the persisted pointer
/// record layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// RFC 3339 UTC timestamp of the ingestion run.
    pub date: String,
    /// Upstream URL the payload was fetched from.
    pub source: String,
    /// Lowercase hex SHA-256 of the canonical body.
    pub checksum: String,
    /// Blob key the canonical body is stored under.
    pub key: String,
    /// Canonical body length in bytes.
    pub size: u64,
    pub content_type: String,
}

impl SnapshotMetadata {
    /// Serialize to the pointer record format.
    pub fn to_pointer_record(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a pointer record.
    pub fn from_pointer_record(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// The current snapshot as returned to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSnapshot {
    pub metadata: SnapshotMetadata,
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SnapshotMetadata {
        SnapshotMetadata {
            date: "2024-03-01T12:30:45.123Z".to_string(),
            source: "https://example.com/sp500.json".to_string(),
            checksum: "43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777"
                .to_string(),
            key: "snapshots/2024-03-01T12-30-45-123Z-43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777.json".to_string(),
            size: 13,
            content_type: SNAPSHOT_CONTENT_TYPE.to_string(),
        }
    }

    #[test]
    fn test_pointer_record_uses_camel_case() {
        let raw = sample().to_pointer_record().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["contentType"], "application/json");
        assert_eq!(value["size"], 13);
        assert!(value.get("content_type").is_none());
    }

    #[test]
    fn test_pointer_record_parses_persisted_layout() {
        let raw = r#"{
            "date": "2024-03-01T12:30:45.123Z",
            "source": "https://example.com/sp500.json",
            "checksum": "43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777",
            "key": "snapshots/2024-03-01T12-30-45-123Z-43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777.json",
            "size": 13,
            "contentType": "application/json"
        }"#;

        let parsed = SnapshotMetadata::from_pointer_record(raw).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_pointer_record_rejects_missing_fields() {
        let raw = r#"{"date": "2024-03-01T12:30:45.123Z"}"#;
        assert!(SnapshotMetadata::from_pointer_record(raw).is_err());
    }
}
