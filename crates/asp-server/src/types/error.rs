//! Error types and ASP error codes for the server.

use serde::{Deserialize, Serialize};

use asp_sheets::SheetError;

/// Error codes carried in the payload of `ERROR` envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No handler is registered for the request's `type`.
    UnknownType,
    /// The range string is not `<COL><ROW>:<COL><ROW>`.
    RangeParseError,
    /// The requested sheet does not exist.
    TableNotFound,
    /// The request body is not JSON.
    ParseError,
    /// The request is JSON but not a request envelope.
    InvalidRequest,
    /// The payload does not fit the message type.
    InvalidPayload,
    /// The sheet store could not be read.
    StorageError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownType => "UNKNOWN_TYPE",
            ErrorCode::RangeParseError => "RANGE_PARSE_ERROR",
            ErrorCode::TableNotFound => "TABLE_NOT_FOUND",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InvalidPayload => "INVALID_PAYLOAD",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an `ERROR` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

/// All errors that can occur in the ASP server.
#[derive(thiserror::Error, Debug)]
pub enum AspError {
    #[error("No handler for {0}")]
    UnknownType(String),

    #[error("Invalid range format: {0}")]
    MalformedRange(String),

    #[error("Sheet not found: {0}")]
    TableNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid tool catalog: {0}")]
    InvalidCatalog(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AspError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AspError::UnknownType(_) => ErrorCode::UnknownType,
            AspError::MalformedRange(_) => ErrorCode::RangeParseError,
            AspError::TableNotFound(_) => ErrorCode::TableNotFound,
            AspError::ParseError(_) | AspError::Json(_) => ErrorCode::ParseError,
            AspError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            AspError::InvalidPayload(_) => ErrorCode::InvalidPayload,
            AspError::Storage(_) | AspError::Io(_) => ErrorCode::StorageError,
            AspError::InvalidCatalog(_) | AspError::Internal(_) | AspError::Transport(_) => {
                ErrorCode::InternalError
            }
        }
    }

    /// Whether the error was caused by the client's request.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self.code(),
            ErrorCode::StorageError | ErrorCode::InternalError
        )
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl From<SheetError> for AspError {
    fn from(e: SheetError) -> Self {
        match e {
            SheetError::MalformedRange(range) => AspError::MalformedRange(range),
            SheetError::TableNotFound(name) => AspError::TableNotFound(name),
            other => AspError::Storage(other.to_string()),
        }
    }
}

pub type AspResult<T> = Result<T, AspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_as_wire_strings() {
        for code in [
            ErrorCode::UnknownType,
            ErrorCode::RangeParseError,
            ErrorCode::TableNotFound,
            ErrorCode::ParseError,
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidPayload,
            ErrorCode::StorageError,
            ErrorCode::InternalError,
        ] {
            assert_eq!(serde_json::to_value(code).unwrap(), code.as_str());
        }
    }

    #[test]
    fn test_sheet_error_mapping() {
        let e: AspError = SheetError::MalformedRange("A:B5".into()).into();
        assert_eq!(e.code(), ErrorCode::RangeParseError);
        assert!(e.is_client_error());

        let e: AspError = SheetError::TableNotFound("Nope".into()).into();
        assert_eq!(e.code(), ErrorCode::TableNotFound);
        assert_eq!(e.to_string(), "Sheet not found: Nope");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: AspError = SheetError::Io(io).into();
        assert_eq!(e.code(), ErrorCode::StorageError);
        assert!(!e.is_client_error());
    }

    #[test]
    fn test_payload() {
        let payload = AspError::UnknownType("NO_SUCH_TYPE".into()).to_payload();
        assert_eq!(payload.code, ErrorCode::UnknownType);
        assert_eq!(payload.message, "No handler for NO_SUCH_TYPE");
    }
}
