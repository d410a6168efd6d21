//! Canonical JSON serialization for deterministic model hashing.
//!
//! Sorted object keys, no whitespace, blake3 over the bytes. Two structurally
//! equal models always hash to the same hex digest.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanonicalError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Serialize a value to canonical JSON (sorted keys, compact)
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json = serde_json::to_value(value)
        .map_err(|e| CanonicalError::Serialization(e.to_string()))?;
    let canonical = sort_keys(&json);
    serde_json::to_string(&canonical).map_err(|e| CanonicalError::Serialization(e.to_string()))
}

fn sort_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let sorted: BTreeMap<String, serde_json::Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), sort_keys(v)))
                .collect();
            serde_json::Value::Object(sorted.into_iter().collect())
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(sort_keys).collect())
        }
        other => other.clone(),
    }
}

/// Blake3 hash of the canonical JSON representation, hex-encoded
pub fn hash_canonical_hex<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json = to_canonical_json(value)?;
    Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
}
