//! Latest snapshot reads
//!
//! Resolves the latest pointer, then fetches the blob it names. Two states
//! are normal absence rather than errors:
//! - no pointer yet (nothing ingested)
//! - pointer naming a missing blob (orphaned or retention-deleted)
//!
//! Storage outages and undecodable records do propagate. Reads never mutate
//! either store.

use tracing::{debug, warn};
use types::errors::ReadError;
use types::snapshot::{DatasetSnapshot, SnapshotMetadata, LATEST_DATASET_KEY};

use crate::checksum::verify_checksum;
use crate::store::{BlobStore, PointerStore};

/// Read the current latest snapshot.
///
/// Returns `Ok(None)` when nothing has been published or the pointer and
/// blob disagree.
pub async fn get_latest(
    blobs: &dyn BlobStore,
    pointer: &dyn PointerStore,
) -> Result<Option<DatasetSnapshot>, ReadError> {
    let Some(metadata) = get_latest_metadata(pointer).await? else {
        debug!("No snapshot published yet");
        return Ok(None);
    };

    let Some(blob) = blobs.get(&metadata.key).await? else {
        warn!(
            key = %metadata.key,
            checksum = %metadata.checksum,
            "Latest pointer references a missing blob; treating as no snapshot"
        );
        return Ok(None);
    };

    if !verify_checksum(&blob.body, &metadata.checksum) {
        warn!(
            key = %metadata.key,
            checksum = %metadata.checksum,
            "Snapshot body does not match recorded checksum"
        );
    }

    let data = serde_json::from_slice(&blob.body).map_err(|e| ReadError::CorruptBlob {
        key: metadata.key.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(DatasetSnapshot { metadata, data }))
}

/// Read only the latest pointer record.
pub async fn get_latest_metadata(
    pointer: &dyn PointerStore,
) -> Result<Option<SnapshotMetadata>, ReadError> {
    let Some(raw) = pointer.get(LATEST_DATASET_KEY).await? else {
        return Ok(None);
    };

    SnapshotMetadata::from_pointer_record(&raw)
        .map(Some)
        .map_err(|e| ReadError::CorruptPointer(e.to_string()))
}
