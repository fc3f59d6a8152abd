use serde::Serialize;
use std::collections::BTreeMap;
use types::snapshot::SnapshotMetadata;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ingest: BTreeMap<String, u64>,
    /// Last snapshot published by this process, if any.
    pub last_published: Option<SnapshotMetadata>,
    pub local_dataset_fallbacks: u64,
}
