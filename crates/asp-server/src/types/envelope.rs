//! The ASP response envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::{ErrorCode, ErrorPayload};
use super::tool::ToolDescriptor;

/// Protocol revision stamped on every envelope.
pub const ASP_VERSION: &str = "1.0";

/// Identity of this process as a sender.
pub const SENDER: &str = "spreadsheet";

/// Response envelope types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    DataResponse,
    Error,
    DiscoverResponse,
}

/// A versioned, timestamped, uniquely identified response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub asp_version: String,
    pub message_id: String,
    pub sender: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
}

impl Envelope {
    /// Wrap `payload`, stamping a fresh message id and the current UTC time.
    pub fn new(message_type: MessageType, payload: Value) -> Self {
        Self {
            asp_version: ASP_VERSION.to_string(),
            message_id: Uuid::new_v4().to_string(),
            sender: SENDER.to_string(),
            message_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    pub fn data(payload: Value) -> Self {
        Self::new(MessageType::DataResponse, payload)
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let payload = ErrorPayload {
            code,
            message: message.into(),
        };
        Self::new(
            MessageType::Error,
            serde_json::to_value(&payload).unwrap_or_default(),
        )
    }

    pub fn discover(tools: &[ToolDescriptor]) -> Self {
        Self::new(MessageType::DiscoverResponse, json!({ "tools": tools }))
    }

    pub fn is_error(&self) -> bool {
        self.message_type == MessageType::Error
    }

    /// The error payload, if this is a well-formed `ERROR` envelope.
    pub fn error_payload(&self) -> Option<ErrorPayload> {
        if !self.is_error() {
            return None;
        }
        serde_json::from_value(self.payload.clone()).ok()
    }
}

/// Wrap `payload` in an envelope of the given type.
pub fn make_envelope(message_type: MessageType, payload: Value) -> Envelope {
    Envelope::new(message_type, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let env = make_envelope(MessageType::DataResponse, json!({ "sheets": ["a"] }));
        let value = serde_json::to_value(&env).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            ["asp_version", "message_id", "sender", "type", "timestamp", "payload"]
        );
        assert_eq!(value["asp_version"], "1.0");
        assert_eq!(value["sender"], "spreadsheet");
        assert_eq!(value["type"], "DATA_RESPONSE");
        assert_eq!(value["payload"]["sheets"][0], "a");
    }

    #[test]
    fn test_message_ids_unique() {
        let a = Envelope::data(json!({}));
        let b = Envelope::data(json!({}));
        assert_ne!(a.message_id, b.message_id);
        assert!(Uuid::parse_str(&a.message_id).is_ok());
    }

    #[test]
    fn test_timestamp_is_utc_iso8601() {
        let env = Envelope::data(json!({}));
        let value = serde_json::to_value(&env).unwrap();
        let ts = value["timestamp"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(ts).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_payload_untouched() {
        let payload = json!({ "rows": [{ "Name": "Ann", "Age": 30 }] });
        let env = Envelope::data(payload.clone());
        assert_eq!(env.payload, payload);
    }

    #[test]
    fn test_error_envelope() {
        let env = Envelope::error(ErrorCode::UnknownType, "No handler for X");
        assert!(env.is_error());
        assert_eq!(env.payload, json!({ "code": "UNKNOWN_TYPE", "message": "No handler for X" }));
        let payload = env.error_payload().unwrap();
        assert_eq!(payload.code, ErrorCode::UnknownType);
    }

    #[test]
    fn test_envelope_roundtrips_through_json() {
        let env = Envelope::error(ErrorCode::TableNotFound, "Sheet not found: x");
        let text = serde_json::to_string(&env).unwrap();
        let back: Envelope = serde_json::from_str(&text).unwrap();
        assert_eq!(back, env);
    }
}
