//! Market Data Snapshot Service
//!
//! Ingests a third-party market-data payload on a schedule, canonicalizes
//! it, content-addresses it, and publishes it as an immutable snapshot
//! behind a single mutable "latest" pointer. Readers always get a
//! consistent, versioned dataset without racing the writer.
//!
//! # Architecture
//!
//! ```text
//!   Scheduler tick
//!        │
//!   ┌────▼────┐
//!   │ Fetch   │  ← upstream GET, JSON
//!   └────┬────┘
//!   ┌────▼──────────┐
//!   │ Canonicalize  │  ← sorted keys, stable bytes
//!   └────┬──────────┘
//!   ┌────▼────┐
//!   │ Hash    │  ← SHA-256 → snapshots/<date>-<digest>.json
//!   └────┬────┘
//!   ┌────▼──────┐   ┌──────────────┐
//!   │ BlobStore │ → │ PointerStore │  ← blob first, then pointer
//!   └───────────┘   └──────┬───────┘
//!                          │
//!                   ┌──────▼──────┐
//!                   │ get_latest  │  ← request-time reads
//!                   └─────────────┘
//! ```
//!
//! The [`local_cache`] module is a separate, simpler path: a bundled CSV
//! dataset with last-known-good fallback.

pub mod canonical;
pub mod checksum;
pub mod fetch;
pub mod ingestion;
pub mod local_cache;
pub mod metrics;
pub mod scheduler;
pub mod snapshot;
pub mod store;

pub use ingestion::{ingest, ingest_at};
pub use snapshot::get_latest;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
