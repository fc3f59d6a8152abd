//! Snapshot ingestion pipeline
//!
//! fetch → canonicalize → hash → persist blob → persist pointer.
//!
//! Write ordering is the only consistency mechanism: the blob write must
//! complete before the pointer is touched, so the pointer never references
//! a body that does not exist yet. A pointer write failing after the blob
//! write leaves an unreferenced (orphan) blob, which is harmless.
//!
//! No retries here. Failures surface to the caller, which treats them as
//! transient and tries again on its next tick.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info, warn, Instrument};
use types::errors::{IngestError, StorageError, UpstreamError};
use types::snapshot::{SnapshotMetadata, LATEST_DATASET_KEY, SNAPSHOT_CONTENT_TYPE};
use uuid::Uuid;

use crate::canonical::CanonicalPayload;
use crate::checksum::{compute_checksum, format_snapshot_date, snapshot_key};
use crate::fetch::Fetcher;
use crate::store::{BlobStore, PointerStore};

/// Ingest the upstream payload and publish it as the latest snapshot.
pub async fn ingest(
    upstream_url: &str,
    blobs: &dyn BlobStore,
    pointer: &dyn PointerStore,
    fetcher: &dyn Fetcher,
) -> Result<SnapshotMetadata, IngestError> {
    ingest_at(upstream_url, blobs, pointer, fetcher, Utc::now()).await
}

/// [`ingest`] with an explicit run time.
pub async fn ingest_at(
    upstream_url: &str,
    blobs: &dyn BlobStore,
    pointer: &dyn PointerStore,
    fetcher: &dyn Fetcher,
    now: DateTime<Utc>,
) -> Result<SnapshotMetadata, IngestError> {
    if upstream_url.trim().is_empty() {
        return Err(IngestError::Config(
            "Missing UPSTREAM_URL configuration.".to_string(),
        ));
    }

    let run_id = Uuid::now_v7();
    let span = tracing::info_span!("ingest", %run_id);

    run_pipeline(upstream_url, blobs, pointer, fetcher, now)
        .instrument(span)
        .await
}

async fn run_pipeline(
    upstream_url: &str,
    blobs: &dyn BlobStore,
    pointer: &dyn PointerStore,
    fetcher: &dyn Fetcher,
    now: DateTime<Utc>,
) -> Result<SnapshotMetadata, IngestError> {
    info!(upstream = upstream_url, "Snapshot ingestion started");

    let fetched = fetcher.fetch_json(upstream_url).await?;
    if !fetched.is_success() {
        warn!(status = fetched.status, "Upstream returned non-success status");
        return Err(UpstreamError::Status {
            status: fetched.status,
        }
        .into());
    }

    let payload = parse_payload(&fetched.body)?;
    let canonical = CanonicalPayload::new(payload)?;
    let checksum = compute_checksum(&canonical);
    let date = format_snapshot_date(now);
    let key = snapshot_key(&date, &checksum);
    let size = canonical.len() as u64;
    let (_, body) = canonical.into_parts();

    // The blob must be durable before the pointer can name it.
    blobs
        .put(&key, body.into_bytes(), SNAPSHOT_CONTENT_TYPE)
        .await
        .map_err(|e| {
            error!(key = %key, error = %e, "Snapshot blob write failed; latest pointer unchanged");
            e
        })?;
    debug!(key = %key, size, "Snapshot blob stored");

    let metadata = SnapshotMetadata {
        date,
        source: upstream_url.to_string(),
        checksum,
        key,
        size,
        content_type: SNAPSHOT_CONTENT_TYPE.to_string(),
    };

    let record = metadata
        .to_pointer_record()
        .map_err(|e| StorageError::Backend(format!("pointer record encoding failed: {}", e)))?;
    pointer
        .put(LATEST_DATASET_KEY, record)
        .await
        .map_err(|e| {
            warn!(
                key = %metadata.key,
                error = %e,
                "Latest pointer write failed; stored blob is unreferenced"
            );
            e
        })?;

    info!(
        key = %metadata.key,
        checksum = %metadata.checksum,
        size = metadata.size,
        "Snapshot published"
    );

    Ok(metadata)
}

/// Parse the upstream body, rejecting empty payloads.
fn parse_payload(body: &[u8]) -> Result<Value, UpstreamError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(UpstreamError::EmptyPayload);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => Err(UpstreamError::EmptyPayload),
        Ok(value) => Ok(value),
        Err(e) => Err(UpstreamError::InvalidJson(e.to_string())),
    }
}
