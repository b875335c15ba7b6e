// Portable JSON form of the pool: `{"restaurants": [...], "picked": [...]}`.
//
// Parsing is two-phase: decode into a loose `serde_json::Value`, then check
// field presence and element types before building a `PoolState`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::state::PoolState;

/// Field holding the available names.
pub const AVAILABLE_FIELD: &str = "restaurants";
/// Field holding the accepted names.
pub const PICKED_FIELD: &str = "picked";

/// Reasons a pool document is rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("document is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("document has no `restaurants` array")]
    MissingRestaurants,

    #[error("failed to read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Wire shape shared by the persisted entry and export files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDocument {
    pub restaurants: Vec<String>,
    #[serde(default)]
    pub picked: Vec<String>,
}

impl From<&PoolState> for PoolDocument {
    fn from(state: &PoolState) -> Self {
        PoolDocument {
            restaurants: state.available.clone(),
            picked: state.picked.clone(),
        }
    }
}

impl From<PoolDocument> for PoolState {
    fn from(doc: PoolDocument) -> Self {
        PoolState {
            available: doc.restaurants,
            picked: doc.picked,
        }
    }
}

/// Validate a loosely-typed document.
///
/// `restaurants` must be present and an array, otherwise the whole document is
/// rejected. `picked` defaults to empty when absent or not an array. Within
/// either array, non-string elements are skipped and strings are trimmed, with
/// blank ones skipped.
pub fn from_value(value: &Value) -> Result<PoolDocument, ImportError> {
    let obj = value.as_object().ok_or(ImportError::NotAnObject)?;

    let restaurants = obj
        .get(AVAILABLE_FIELD)
        .and_then(Value::as_array)
        .map(|items| names_from(items))
        .ok_or(ImportError::MissingRestaurants)?;

    let picked = obj
        .get(PICKED_FIELD)
        .and_then(Value::as_array)
        .map(|items| names_from(items))
        .unwrap_or_default();

    Ok(PoolDocument {
        restaurants,
        picked,
    })
}

/// Parse and validate a document from raw bytes.
pub fn from_slice(bytes: &[u8]) -> Result<PoolDocument, ImportError> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_value(&value)
}

/// Compact JSON, as written to the key-value store.
pub fn to_compact_string(doc: &PoolDocument) -> String {
    // Serializing a struct of string vectors cannot fail.
    serde_json::to_string(doc).unwrap_or_default()
}

/// Two-space indented JSON, as written to export files.
pub fn to_pretty_bytes(doc: &PoolDocument) -> Vec<u8> {
    serde_json::to_vec_pretty(doc).unwrap_or_default()
}

fn names_from(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
