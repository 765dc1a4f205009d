//! Response-envelope normalization.
//!
//! Every platform response is a JSON envelope whose `data` member, when
//! populated, is itself a serialized JSON document — a string holding the
//! real payload. Normalization makes that second decode an explicit step:
//! after [`normalize`], `data` is a structured value, never a JSON string.
//!
//! `data` values that are absent, `false`, `null`, the empty string, or
//! already structured pass through untouched; only a non-empty string is
//! treated as a nested document. A nested string that fails to parse is a
//! fatal [`ApiError::NestedDecode`], kept distinct from the outer
//! [`ApiError::EnvelopeDecode`] so remote-side partial-envelope bugs are
//! diagnosable.

use serde_json::Value;
use tracing::trace;

use crate::error::ApiError;

/// Parse a raw response body and decode the nested `data` document in place.
pub fn normalize(body: &str) -> Result<Value, ApiError> {
    let mut envelope: Value =
        serde_json::from_str(body).map_err(|e| ApiError::EnvelopeDecode(e.to_string()))?;
    if let Some(nested) = decode_data(&envelope)? {
        trace!("decoded nested data document");
        envelope["data"] = nested;
    }
    Ok(envelope)
}

fn decode_data(envelope: &Value) -> Result<Option<Value>, ApiError> {
    let Some(data) = envelope.get("data").and_then(Value::as_str) else {
        return Ok(None);
    };
    if data.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(data)
        .map(Some)
        .map_err(|e| ApiError::NestedDecode(e.to_string()))
}
