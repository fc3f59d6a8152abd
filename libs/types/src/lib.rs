//! Types library for the market data services
//!
//! Record shapes that are persisted or served over HTTP, plus the error
//! taxonomy shared by ingestion, storage and read paths. Persisted layouts
//! (`SnapshotMetadata`, the pointer record) must remain stable: readers of
//! older snapshots depend on them.
//!
//! # Modules
//! - `snapshot`: Snapshot metadata and the `{ metadata, data }` read shape
//! - `dataset`: Tabular rows and metadata served by the local dataset cache
//! - `errors`: Error taxonomy

pub mod snapshot;
pub mod dataset;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::snapshot::*;
    pub use crate::dataset::*;
    pub use crate::errors::*;
}
