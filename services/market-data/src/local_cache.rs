//! Resilient local dataset
//!
//! Parses a bundled CSV into rows on every call and memoizes the last
//! successful parse. When a parse fails, the memo is served instead; with no
//! memo, an empty dataset carrying the source label is returned. Callers
//! therefore always receive a well-formed dataset and never an error.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, error, warn};
use types::dataset::{DataRow, Dataset, DatasetMetadata};
use types::errors::DatasetError;

/// Source label for the bundled S&P 500 series.
pub const SP500_SOURCE: &str = "MacroTrends S&P 500 Historical Data";

const BUNDLED_SP500_CSV: &str = include_str!("../data/sp500.csv");

/// Provides the raw CSV text.
pub trait DatasetSource: Send + Sync {
    fn load(&self) -> Result<Cow<'_, str>, DatasetError>;
}

/// CSV text compiled into the binary. No I/O.
#[derive(Debug, Clone, Copy)]
pub struct BundledSource {
    csv: &'static str,
}

impl BundledSource {
    pub fn new(csv: &'static str) -> Self {
        Self { csv }
    }

    /// The bundled S&P 500 series.
    pub fn sp500() -> Self {
        Self::new(BUNDLED_SP500_CSV)
    }
}

impl DatasetSource for BundledSource {
    fn load(&self) -> Result<Cow<'_, str>, DatasetError> {
        Ok(Cow::Borrowed(self.csv))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Sort rows ascending by date. Rows with unparseable dates go last.
    pub sort_by_date: bool,
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Serialized field names of `DataRow`; extra columns may not reuse them.
const RESERVED_COLUMNS: [&str; 2] = ["date", "value"];

/// Parse CSV text into rows.
///
/// Column 0 is the date, column 1 the value; further columns are kept by
/// header name unless it is `date` or `value`. Rows whose value is not a
/// finite number are dropped.
pub fn parse_csv(raw: &str, options: ParseOptions) -> Result<Vec<DataRow>, DatasetError> {
    let mut lines = raw.trim().split('\n');

    let headers: Vec<String> = match lines.next() {
        Some(line) if !line.trim().is_empty() => line
            .split(',')
            .map(|header| header.trim().replace('\r', ""))
            .collect(),
        _ => return Err(DatasetError::MissingHeaders),
    };
    if headers.len() < 2 {
        return Err(DatasetError::MissingValueColumn);
    }

    let mut rows: Vec<DataRow> = lines
        .filter_map(|line| {
            let values: Vec<&str> = line.trim_end_matches('\r').split(',').collect();
            let value = values.get(1)?.trim().parse::<f64>().ok()?;
            let date = values.first()?.trim();

            let mut row = DataRow::new(date, value)?;
            for (index, header) in headers.iter().enumerate().skip(2) {
                if RESERVED_COLUMNS.contains(&header.as_str()) {
                    continue;
                }
                if let Some(cell) = values.get(index) {
                    row = row.with_column(header.as_str(), cell.trim());
                }
            }
            Some(row)
        })
        .collect();

    if options.sort_by_date {
        rows.sort_by_key(|row| {
            let date = parse_date(&row.date);
            (date.is_none(), date)
        });
    }

    Ok(rows)
}

/// Build metadata: `last_updated` is the latest row date.
///
/// Dates are compared as calendar dates; if none parse, the first row's
/// date is used.
pub fn build_metadata(rows: &[DataRow], source: &str) -> DatasetMetadata {
    let Some(first) = rows.first() else {
        return DatasetMetadata::empty(source);
    };

    let latest = rows
        .iter()
        .filter_map(|row| parse_date(&row.date).map(|date| (date, row)))
        .max_by_key(|(date, _)| *date)
        .map(|(_, row)| row)
        .unwrap_or(first);

    DatasetMetadata {
        last_updated: latest.date.clone(),
        source: source.to_string(),
    }
}

/// Dataset cache with last-known-good fallback.
///
/// One instance per process; safe to share across threads.
pub struct LocalDatasetCache<S = BundledSource> {
    source: S,
    label: String,
    options: ParseOptions,
    last_good: Mutex<Option<Dataset>>,
    fallbacks: AtomicU64,
}

impl LocalDatasetCache<BundledSource> {
    /// Cache over the bundled S&P 500 series, sorted by date.
    pub fn sp500() -> Self {
        Self::new(
            BundledSource::sp500(),
            SP500_SOURCE,
            ParseOptions { sort_by_date: true },
        )
    }
}

impl<S: DatasetSource> LocalDatasetCache<S> {
    pub fn new(source: S, label: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            source,
            label: label.into(),
            options,
            last_good: Mutex::new(None),
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Parse the source, falling back to the last good parse on failure.
    pub fn get_dataset(&self) -> Dataset {
        match self.parse() {
            Ok(dataset) => {
                debug!(rows = dataset.len(), last_updated = %dataset.metadata.last_updated, "Dataset parsed");
                *self.last_good.lock().unwrap_or_else(PoisonError::into_inner) = Some(dataset.clone());
                dataset
            }
            Err(e) => {
                error!(error = %e, source = %self.label, "Failed to parse dataset");
                let memo = self
                    .last_good
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();

                match memo {
                    Some(dataset) => {
                        self.fallbacks.fetch_add(1, Ordering::Relaxed);
                        warn!(source = %self.label, rows = dataset.len(), "Falling back to previously cached dataset");
                        dataset
                    }
                    None => Dataset::empty(self.label.as_str()),
                }
            }
        }
    }

    /// Number of times a fallback was served.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn parse(&self) -> Result<Dataset, DatasetError> {
        let raw = self.source.load()?;
        let rows = parse_csv(&raw, self.options)?;
        let metadata = build_metadata(&rows, &self.label);
        Ok(Dataset::new(rows, metadata))
    }
}
