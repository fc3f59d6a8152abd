//! Observability for the ingestion pipeline
//!
//! Counters and run-duration tracking for scheduled snapshot ingestion,
//! exported as an ordered map for the health endpoint.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use types::snapshot::SnapshotMetadata;

/// Core metrics for snapshot ingestion.
pub struct IngestMetrics {
    pub runs_attempted: AtomicU64,
    pub runs_succeeded: AtomicU64,
    pub runs_failed: AtomicU64,
    pub run_duration_ms: Mutex<LatencyTracker>,
    /// Metadata of the last snapshot this process published.
    pub last_success: Mutex<Option<SnapshotMetadata>>,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self {
            runs_attempted: AtomicU64::new(0),
            runs_succeeded: AtomicU64::new(0),
            runs_failed: AtomicU64::new(0),
            run_duration_ms: Mutex::new(LatencyTracker::new(100)),
            last_success: Mutex::new(None),
        }
    }

    /// Record the start of a run.
    pub fn record_attempt(&self) {
        self.runs_attempted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful run.
    pub fn record_success(&self, metadata: &SnapshotMetadata, duration_ms: u64) {
        self.runs_succeeded.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut tracker) = self.run_duration_ms.lock() {
            tracker.record(duration_ms);
        }
        if let Ok(mut last) = self.last_success.lock() {
            *last = Some(metadata.clone());
        }
    }

    /// Record a failed run.
    pub fn record_failure(&self, duration_ms: u64) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut tracker) = self.run_duration_ms.lock() {
            tracker.record(duration_ms);
        }
    }

    /// Metadata of the last successful run, if any.
    pub fn last_success(&self) -> Option<SnapshotMetadata> {
        self.last_success.lock().ok().and_then(|last| last.clone())
    }

    /// Export counters as a BTreeMap.
    pub fn export(&self) -> BTreeMap<String, u64> {
        let mut m = BTreeMap::new();
        m.insert("runs_attempted".to_string(), self.runs_attempted.load(Ordering::Relaxed));
        m.insert("runs_succeeded".to_string(), self.runs_succeeded.load(Ordering::Relaxed));
        m.insert("runs_failed".to_string(), self.runs_failed.load(Ordering::Relaxed));
        if let Ok(tracker) = self.run_duration_ms.lock() {
            if let Some(p50) = tracker.percentile(50) {
                m.insert("run_duration_p50_ms".to_string(), p50);
            }
            if let Some(p99) = tracker.percentile(99) {
                m.insert("run_duration_p99_ms".to_string(), p99);
            }
        }
        m
    }
}

impl Default for IngestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks latency samples for percentile calculation.
pub struct LatencyTracker {
    samples: Vec<u64>,
    max_samples: usize,
}

impl LatencyTracker {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: Vec::with_capacity(max_samples),
            max_samples,
        }
    }

    /// Record a latency sample.
    pub fn record(&mut self, value: u64) {
        if self.samples.len() >= self.max_samples {
            self.samples.remove(0);
        }
        self.samples.push(value);
    }

    /// Get a percentile value (0-100).
    pub fn percentile(&self, p: usize) -> Option<u64> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sorted = self.samples.clone();
        sorted.sort_unstable();

        let idx = (p as f64 / 100.0 * (sorted.len() - 1) as f64) as usize;
        Some(sorted[idx.min(sorted.len() - 1)])
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }
}
