//! Scheduled ingestion
//!
//! Drives the pipeline on a fixed period. Each tick awaits its run to
//! completion before the next tick can fire, so at most one ingestion is in
//! flight. A failed tick is logged and swallowed; the previous latest
//! snapshot stays serviceable and the next tick tries again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use types::errors::IngestError;
use types::snapshot::SnapshotMetadata;

use crate::fetch::Fetcher;
use crate::ingestion::ingest;
use crate::metrics::IngestMetrics;
use crate::store::{BlobStore, PointerStore};

/// Everything one ingestion run needs.
#[derive(Clone)]
pub struct SyncJob {
    pub upstream_url: String,
    pub blobs: Arc<dyn BlobStore>,
    pub pointer: Arc<dyn PointerStore>,
    pub fetcher: Arc<dyn Fetcher>,
    pub metrics: Arc<IngestMetrics>,
}

impl SyncJob {
    /// Run one ingestion and record it in the metrics.
    pub async fn run_once(&self) -> Result<SnapshotMetadata, IngestError> {
        self.metrics.record_attempt();
        let started = Instant::now();

        let result = ingest(
            &self.upstream_url,
            self.blobs.as_ref(),
            self.pointer.as_ref(),
            self.fetcher.as_ref(),
        )
        .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(metadata) => self.metrics.record_success(metadata, elapsed_ms),
            Err(_) => self.metrics.record_failure(elapsed_ms),
        }
        result
    }

    /// Run one ingestion, logging instead of returning failures.
    pub async fn run_logged(&self) {
        let scheduled_at = Utc::now().to_rfc3339();
        match self.run_once().await {
            Ok(metadata) => info!(
                scheduled_at = %scheduled_at,
                key = %metadata.key,
                "Scheduled sync completed"
            ),
            Err(e) => error!(
                scheduled_at = %scheduled_at,
                error = %e,
                "Scheduled sync failed"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub interval: Duration,
    /// Fire the first tick immediately instead of after one interval.
    pub run_immediately: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(24 * 60 * 60),
            run_immediately: true,
        }
    }
}

/// Run `job` every `config.interval` until `shutdown` becomes `true` or its
/// sender is dropped. An in-flight run always completes first.
pub async fn run_scheduler(job: SyncJob, config: SchedulerConfig, mut shutdown: watch::Receiver<bool>) {
    let start = if config.run_immediately {
        tokio::time::Instant::now()
    } else {
        tokio::time::Instant::now() + config.interval
    };
    let mut ticker = tokio::time::interval_at(start, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        interval_secs = config.interval.as_secs(),
        run_immediately = config.run_immediately,
        "Ingestion scheduler started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tokio::select! {
                    _ = job.run_logged() => {}
                    _ = shutdown_requested(&mut shutdown) => {
                        warn!("Shutdown requested during ingestion; abandoning run");
                        break;
                    }
                }
            }
            _ = shutdown_requested(&mut shutdown) => break,
        }
    }

    info!("Ingestion scheduler stopped");
}

/// Resolves once shutdown is signalled or the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
