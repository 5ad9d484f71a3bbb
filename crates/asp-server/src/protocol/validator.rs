//! Minimal shape checks on inbound requests.

use serde_json::Value;

use crate::types::{AspError, AspRequest, AspResult};

/// Check that a request's payload, when present, is a JSON object.
///
/// A missing or unknown `type` is not a validation failure; dispatch answers
/// it with `UNKNOWN_TYPE`.
pub fn validate_request(request: &AspRequest) -> AspResult<()> {
    match &request.payload {
        Value::Null | Value::Object(_) => Ok(()),
        other => Err(AspError::InvalidRequest(format!(
            "payload must be an object, got {}",
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
