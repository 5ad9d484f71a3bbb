//! Message framing for newline-delimited JSON.

use serde_json::Value;

use crate::types::{AspError, AspRequest, AspResult, Envelope};

/// Parse request text (one JSON object) into a request.
pub fn parse_request(text: &str) -> AspResult<AspRequest> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AspError::ParseError("Empty message".to_string()));
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| AspError::ParseError(e.to_string()))?;
    request_from_value(value)
}

/// Interpret an already-parsed JSON value as a request.
pub fn request_from_value(value: Value) -> AspResult<AspRequest> {
    if !value.is_object() {
        return Err(AspError::InvalidRequest(
            "Request must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| AspError::InvalidRequest(e.to_string()))
}

/// Serialize an envelope to a JSON line (with trailing newline).
pub fn frame_envelope(envelope: &Envelope) -> AspResult<String> {
    let mut json = serde_json::to_string(envelope).map_err(AspError::Json)?;
    json.push('\n');
    Ok(json)
}
