use market_data::local_cache::LocalDatasetCache;
use market_data::metrics::IngestMetrics;
use market_data::store::{BlobStore, PointerStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub blobs: Arc<dyn BlobStore>,
    pub pointer: Arc<dyn PointerStore>,
    pub local_dataset: Arc<LocalDatasetCache>,
    pub ingest_metrics: Arc<IngestMetrics>,
}

impl AppState {
    pub fn new(blobs: Arc<dyn BlobStore>, pointer: Arc<dyn PointerStore>) -> Self {
        Self {
            blobs,
            pointer,
            local_dataset: Arc::new(LocalDatasetCache::sp500()),
            ingest_metrics: Arc::new(IngestMetrics::new()),
        }
    }
}
