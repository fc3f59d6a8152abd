//! Content hashing and snapshot key derivation
//!
//! The checksum is a content fingerprint, not an authenticator. Keys are
//! chronologically sortable, content-addressed and safe for both URLs and
//! filesystems.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalPayload;

/// Prefix under which every snapshot body is stored.
pub const SNAPSHOT_PREFIX: &str = "snapshots/";

/// Length of a hex-encoded SHA-256 digest.
pub const CHECKSUM_HEX_LEN: usize = 64;

/// SHA-256 of arbitrary bytes as 64 lowercase hex characters.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Checksum of a canonical payload's body.
pub fn compute_checksum(payload: &CanonicalPayload) -> String {
    sha256_hex(payload.as_bytes())
}

/// Snapshot date string: RFC 3339, UTC, millisecond precision, `Z` suffix.
pub fn format_snapshot_date(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Derive the blob key for a snapshot.
///
/// `snapshots/{date with ':' and '.' replaced by '-'}-{checksum}.json`.
/// Pure function of its inputs; this layout is persisted and must not change.
pub fn snapshot_key(date: &str, checksum: &str) -> String {
    let safe_date: String = date
        .chars()
        .map(|c| if c == ':' || c == '.' { '-' } else { c })
        .collect();
    format!("{}{}-{}.json", SNAPSHOT_PREFIX, safe_date, checksum)
}

/// Verify that a body hashes to the expected checksum.
pub fn verify_checksum(body: &[u8], expected: &str) -> bool {
    sha256_hex(body) == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const AB_DIGEST: &str = "43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777";

    #[test]
    fn test_known_digest() {
        let payload = CanonicalPayload::new(json!({"b": 2, "a": 1})).unwrap();
        assert_eq!(compute_checksum(&payload), AB_DIGEST);
    }

    #[test]
    fn test_digest_is_lowercase_hex() {
        let digest = sha256_hex(b"market data");
        assert_eq!(digest.len(), CHECKSUM_HEX_LEN);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_deterministic_checksum() {
        let a = CanonicalPayload::new(json!({"x": [1, 2, {"z": 1, "y": 2}]})).unwrap();
        let b = CanonicalPayload::new(json!({"x": [1, 2, {"y": 2, "z": 1}]})).unwrap();
        assert_eq!(compute_checksum(&a), compute_checksum(&b));
    }

    #[test]
    fn test_changed_value_changes_checksum() {
        let a = CanonicalPayload::new(json!({"a": 1, "b": 2})).unwrap();
        let b = CanonicalPayload::new(json!({"a": 1, "b": 3})).unwrap();
        assert_eq!(
            compute_checksum(&b),
            "f9c6777fb86597920de313c707c2c0aa7b059e208a66e1f56f7a2b548e11453d"
        );
        assert_ne!(compute_checksum(&a), compute_checksum(&b));
    }

    #[test]
    fn test_array_order_changes_checksum() {
        let a = CanonicalPayload::new(json!([1, 2])).unwrap();
        let b = CanonicalPayload::new(json!([2, 1])).unwrap();
        assert_ne!(compute_checksum(&a), compute_checksum(&b));
    }

    #[test]
    fn test_snapshot_date_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(format_snapshot_date(at), "2024-03-01T12:30:45.123Z");

        let whole = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(format_snapshot_date(whole), "2024-03-01T00:00:00.000Z");
    }

    #[test]
    fn test_snapshot_key_layout() {
        let key = snapshot_key("2024-03-01T12:30:45.123Z", AB_DIGEST);
        assert_eq!(
            key,
            format!("snapshots/2024-03-01T12-30-45-123Z-{}.json", AB_DIGEST)
        );
    }

    #[test]
    fn test_snapshot_key_is_pure_and_safe() {
        let date = "2024-03-01T12:30:45.123Z";
        let k1 = snapshot_key(date, AB_DIGEST);
        let k2 = snapshot_key(date, AB_DIGEST);
        assert_eq!(k1, k2);

        let stem = k1.trim_start_matches(SNAPSHOT_PREFIX).trim_end_matches(".json");
        assert!(!stem.contains(':'));
        assert!(!stem.contains('.'));
    }

    #[test]
    fn test_snapshot_keys_sort_chronologically() {
        let earlier = snapshot_key("2024-03-01T12:30:45.123Z", AB_DIGEST);
        let later = snapshot_key("2024-03-02T00:00:00.000Z", AB_DIGEST);
        assert!(earlier < later);
    }

    #[test]
    fn test_verify_checksum() {
        assert!(verify_checksum(br#"{"a":1,"b":2}"#, AB_DIGEST));
        assert!(!verify_checksum(br#"{"b":2,"a":1}"#, AB_DIGEST));
    }
}
