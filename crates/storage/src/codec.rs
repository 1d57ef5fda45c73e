//! Document codec
//!
//! Bytes on disk are pretty-printed JSON. Anything that does not decode into
//! a [`Document`] with a `"source"` root is reported as `CorruptDocument`.

use crate::document::Document;
use stockroom_core::{StoreError, StoreResult};

/// Parse a full document.
///
/// Callers treat an empty (or whitespace-only) file as "absent" before
/// calling this; here it is simply invalid JSON.
pub fn decode(bytes: &[u8]) -> StoreResult<Document> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::corrupt(e.to_string()))
}

/// Serialize a full document.
pub fn encode(doc: &Document) -> StoreResult<Vec<u8>> {
    let mut bytes =
        serde_json::to_vec_pretty(doc).map_err(|e| StoreError::corrupt(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// True when the file holds nothing but whitespace.
pub fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| b.is_ascii_whitespace())
}
