//! Tool: READ_RANGE — read a rectangular cell range from a sheet.

use std::sync::Arc;

use serde_json::{json, Value};

use asp_sheets::SpreadsheetBackend;

use crate::protocol::MessageHandler;
use crate::types::{
    AspError, AspRequest, AspResult, Permission, ReadRangeParams, ReadRangeResult,
    ToolDescriptor,
};

pub const MESSAGE_TYPE: &str = "READ_RANGE";

pub fn definition() -> ToolDescriptor {
    ToolDescriptor {
        id: MESSAGE_TYPE.to_string(),
        name: "Read Range".to_string(),
        description: "Read a specific cell range from a sheet".to_string(),
        input_schema: json!({
            "title": "READ_RANGE Payload",
            "type": "object",
            "required": ["sheet", "range"],
            "properties": {
                "sheet": { "type": "string" },
                "range": { "type": "string", "example": "A1:D100" }
            }
        }),
        permission: Permission::Read,
    }
}

pub struct ReadRangeHandler {
    backend: Arc<dyn SpreadsheetBackend>,
}

impl ReadRangeHandler {
    pub fn new(backend: Arc<dyn SpreadsheetBackend>) -> Self {
        Self { backend }
    }
}

impl MessageHandler for ReadRangeHandler {
    fn handle(&self, request: &AspRequest) -> AspResult<Value> {
        let params: ReadRangeParams = request.parse_payload()?;
        let rows = self.backend.read_range(&params.sheet, &params.range)?;
        serde_json::to_value(ReadRangeResult { rows })
            .map_err(|e| AspError::Internal(e.to_string()))
    }
}
