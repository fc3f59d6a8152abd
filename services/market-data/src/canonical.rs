//! Canonical form for upstream payloads
//!
//! Reorders a parsed JSON payload so that semantically identical data always
//! serializes to the same byte string:
//! - arrays keep element order, each element canonicalized
//! - object keys sorted by byte order, each value canonicalized
//! - scalars unchanged
//!
//! Without this, two payloads differing only in key order would hash
//! differently and produce a spurious new snapshot.
//!
//! Byte order is not locale collation: keys differing only in case (`"B"`
//! before `"a"`) sort differently than under `localeCompare`, so such
//! payloads hash differently from snapshots produced by a locale-sorting
//! ingester.

use serde_json::{Map, Value};
use types::errors::CanonicalError;

/// A payload in canonical form together with its serialized body.
///
/// The body is private and only produced here, so every checksum in the
/// pipeline is computed over canonical bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalPayload {
    value: Value,
    body: String,
}

impl CanonicalPayload {
    /// Canonicalize a top-level payload.
    ///
    /// The top level must be an object or an array.
    pub fn new(payload: Value) -> Result<Self, CanonicalError> {
        let value = canonicalize(payload)?;
        let body = value.to_string();
        Ok(Self { value, body })
    }

    /// The canonical value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Compact canonical JSON.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_parts(self) -> (Value, String) {
        (self.value, self.body)
    }
}

/// Canonicalize a top-level payload, rejecting unstructured input.
pub fn canonicalize(payload: Value) -> Result<Value, CanonicalError> {
    match payload {
        Value::Null => Err(CanonicalError::Empty),
        Value::Bool(_) => Err(CanonicalError::NotStructured("boolean")),
        Value::Number(_) => Err(CanonicalError::NotStructured("number")),
        Value::String(_) => Err(CanonicalError::NotStructured("string")),
        structured => Ok(canonicalize_value(structured)),
    }
}

/// Canonicalize any JSON value. Never fails.
pub fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_value).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            // Insert in sorted order so the result is sorted whether or not
            // serde_json's `preserve_order` feature is enabled in the build.
            let mut sorted = Map::with_capacity(entries.len());
            for (key, entry) in entries {
                sorted.insert(key, canonicalize_value(entry));
            }
            Value::Object(sorted)
        }
        scalar => scalar,
    }
}
