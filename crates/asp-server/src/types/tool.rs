//! Tool descriptors served by capability discovery.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Advisory access level of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
}

/// A machine-readable description of one invocable operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// The request `type` that invokes this tool.
    pub id: String,
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub permission: Permission,
}
