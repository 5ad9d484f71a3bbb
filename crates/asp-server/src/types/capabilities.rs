//! Server identity and capability summary.

use serde::{Deserialize, Serialize};

use super::envelope::ASP_VERSION;
use super::tool::ToolDescriptor;

pub const SERVER_NAME: &str = "asp-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What this server is and what it can do, as printed by `asp-server info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
    pub message_types: Vec<String>,
    pub tools: Vec<ToolDescriptor>,
}

impl ServerInfo {
    pub fn new(message_types: Vec<String>, tools: Vec<ToolDescriptor>) -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            protocol_version: ASP_VERSION.to_string(),
            message_types,
            tools,
        }
    }
}
