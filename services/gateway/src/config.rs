//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use market_data::scheduler::SchedulerConfig;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upstream payload URL. Empty means every ingestion tick fails with a
    /// configuration error, which is logged, not fatal.
    pub upstream_url: String,

    /// Root directory of the filesystem stores.
    pub dataset_dir: PathBuf,

    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Period between scheduled ingestion runs.
    pub sync_interval: Duration,

    /// Whether the first ingestion runs at startup.
    pub sync_on_start: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `UPSTREAM_URL`: upstream payload URL (default: empty)
    /// - `DATASET_DIR`: store root (default: "./data")
    /// - `BIND_ADDR`: server bind address (default: "0.0.0.0:8080")
    /// - `SYNC_INTERVAL_SECS`: ingestion period in seconds, > 0 (default: 86400)
    /// - `SYNC_ON_START`: "true"/"false" (default: "true")
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let upstream_url = lookup("UPSTREAM_URL")
            .map(|url| url.trim().to_string())
            .unwrap_or_default();

        let dataset_dir = PathBuf::from(lookup("DATASET_DIR").unwrap_or_else(|| "./data".to_string()));

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let sync_interval_secs = match lookup("SYNC_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("SYNC_INTERVAL_SECS must be a whole number of seconds, got {raw:?}"))?,
            None => 24 * 60 * 60,
        };
        if sync_interval_secs == 0 {
            bail!("SYNC_INTERVAL_SECS must be greater than zero");
        }

        let sync_on_start = match lookup("SYNC_ON_START").map(|raw| raw.trim().to_lowercase()) {
            None => true,
            Some(raw) => match raw.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => bail!("SYNC_ON_START must be true or false, got {raw:?}"),
            },
        };

        if upstream_url.is_empty() {
            tracing::warn!("UPSTREAM_URL is not set; scheduled ingestion will fail until configured");
        }

        let config = Self {
            upstream_url,
            dataset_dir,
            bind_addr,
            sync_interval: Duration::from_secs(sync_interval_secs),
            sync_on_start,
        };

        tracing::info!(
            upstream_url = %config.upstream_url,
            dataset_dir = %config.dataset_dir.display(),
            bind_addr = %config.bind_addr,
            sync_interval_secs,
            sync_on_start = config.sync_on_start,
            "gateway configuration loaded"
        );

        Ok(config)
    }

    /// Blob store root.
    pub fn blob_dir(&self) -> PathBuf {
        self.dataset_dir.join("blobs")
    }

    /// Pointer store root.
    pub fn pointer_dir(&self) -> PathBuf {
        self.dataset_dir.join("meta")
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            interval: self.sync_interval,
            run_immediately: self.sync_on_start,
        }
    }
}
