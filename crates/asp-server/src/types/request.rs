//! ASP request types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{AspError, AspResult};

/// An inbound request: `{ "type": ..., "payload": {...} }`.
///
/// `type` is kept as raw JSON so a non-string type still reaches dispatch
/// and is answered with `UNKNOWN_TYPE`. Any other top-level fields are kept
/// in `metadata` so handlers can read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AspRequest {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<Value>,
    #[serde(default)]
    pub payload: Value,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl AspRequest {
    pub fn new(message_type: impl Into<String>, payload: Value) -> Self {
        Self {
            message_type: Some(Value::String(message_type.into())),
            payload,
            metadata: Map::new(),
        }
    }

    /// The message type, when it is a string.
    pub fn message_type(&self) -> Option<&str> {
        self.message_type.as_ref().and_then(Value::as_str)
    }

    /// The message type as it appears in diagnostics: strings verbatim,
    /// other JSON values in their JSON form, `None` when absent.
    pub fn type_label(&self) -> String {
        match &self.message_type {
            None => "None".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Deserialize the payload into a typed structure.
    ///
    /// A missing or `null` payload is read as an empty object.
    pub fn parse_payload<T: serde::de::DeserializeOwned>(&self) -> AspResult<T> {
        let payload = match &self.payload {
            Value::Null => Value::Object(Map::new()),
            other => other.clone(),
        };
        serde_json::from_value(payload).map_err(|e| AspError::InvalidPayload(e.to_string()))
    }
}

/// Payload of `READ_RANGE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRangeParams {
    pub sheet: String,
    pub range: String,
}

/// Result of `SHEET_LIST`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetListResult {
    pub sheets: Vec<String>,
}

/// Result of `READ_RANGE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRangeResult {
    pub rows: Vec<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_keeps_extra_fields() {
        let req: AspRequest = serde_json::from_value(json!({
            "type": "SHEET_LIST",
            "payload": {},
            "message_id": "abc"
        }))
        .unwrap();
        assert_eq!(req.message_type(), Some("SHEET_LIST"));
        assert_eq!(req.metadata["message_id"], "abc");
    }

    #[test]
    fn test_request_without_type_or_payload() {
        let req: AspRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.message_type.is_none());
        assert_eq!(req.payload, Value::Null);
        assert_eq!(req.type_label(), "None");
    }

    #[test]
    fn test_non_string_type_is_kept() {
        let req: AspRequest = serde_json::from_value(json!({ "type": 5, "payload": {} })).unwrap();
        assert_eq!(req.message_type(), None);
        assert_eq!(req.type_label(), "5");

        let req: AspRequest = serde_json::from_value(json!({ "type": null })).unwrap();
        assert_eq!(req.type_label(), "None");
    }

    #[test]
    fn test_parse_payload() {
        let req = AspRequest::new("READ_RANGE", json!({ "sheet": "Sheet1", "range": "A1:B2" }));
        let params: ReadRangeParams = req.parse_payload().unwrap();
        assert_eq!(params.sheet, "Sheet1");
        assert_eq!(params.range, "A1:B2");
    }

    #[test]
    fn test_parse_payload_missing_field() {
        let req = AspRequest::new("READ_RANGE", json!({ "sheet": "Sheet1" }));
        let err = req.parse_payload::<ReadRangeParams>().unwrap_err();
        assert!(matches!(err, AspError::InvalidPayload(_)));
        assert!(err.to_string().contains("range"));
    }

    #[test]
    fn test_parse_payload_wrong_type() {
        let req = AspRequest::new("READ_RANGE", json!({ "sheet": 1, "range": "A1:B2" }));
        assert!(req.parse_payload::<ReadRangeParams>().is_err());
    }
}
