//! Tabular dataset types
//!
//! Rows handed to the calculators as a `(rows, metadata)` pair. A row only
//! exists if its value column parsed to a finite number.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A single dataset row.
///
/// Serializes flat: `{ "date": .., "value": .., <other columns>.. }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub date: String,
    /// Always finite.
    pub value: f64,
    /// Any further columns, verbatim, keyed by header name.
    #[serde(flatten)]
    pub columns: BTreeMap<String, String>,
}

impl DataRow {
    /// Build a row, rejecting non-finite values.
    pub fn new(date: impl Into<String>, value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Self {
            date: date.into(),
            value,
            columns: BTreeMap::new(),
        })
    }

    /// Attach an extra column.
    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.insert(name.into(), value.into());
        self
    }
}

/// Describes where a dataset came from and how fresh it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    /// Latest row date, or empty when there are no rows.
    pub last_updated: String,
    pub source: String,
}

impl DatasetMetadata {
    pub fn empty(source: impl Into<String>) -> Self {
        Self {
            last_updated: String::new(),
            source: source.into(),
        }
    }
}

/// Rows plus metadata. Cloning shares the row buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub rows: Arc<[DataRow]>,
    pub metadata: DatasetMetadata,
}

impl Dataset {
    pub fn new(rows: Vec<DataRow>, metadata: DatasetMetadata) -> Self {
        Self {
            rows: rows.into(),
            metadata,
        }
    }

    /// Empty dataset carrying only the source label.
    pub fn empty(source: impl Into<String>) -> Self {
        Self::new(Vec::new(), DatasetMetadata::empty(source))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
