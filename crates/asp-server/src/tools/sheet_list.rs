//! Tool: SHEET_LIST — list available sheets.

use std::sync::Arc;

use serde_json::{json, Value};

use asp_sheets::SpreadsheetBackend;

use crate::protocol::MessageHandler;
use crate::types::{
    AspError, AspRequest, AspResult, Permission, SheetListResult, ToolDescriptor,
};

pub const MESSAGE_TYPE: &str = "SHEET_LIST";

pub fn definition() -> ToolDescriptor {
    ToolDescriptor {
        id: MESSAGE_TYPE.to_string(),
        name: "List Sheets".to_string(),
        description: "Returns all available sheet names".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
        permission: Permission::Read,
    }
}

pub struct SheetListHandler {
    backend: Arc<dyn SpreadsheetBackend>,
}

impl SheetListHandler {
    pub fn new(backend: Arc<dyn SpreadsheetBackend>) -> Self {
        Self { backend }
    }
}

impl MessageHandler for SheetListHandler {
    fn handle(&self, _request: &AspRequest) -> AspResult<Value> {
        let sheets = self.backend.list_tables()?;
        serde_json::to_value(SheetListResult { sheets })
            .map_err(|e| AspError::Internal(e.to_string()))
    }
}
