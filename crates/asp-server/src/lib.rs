//! Agent Spreadsheet Protocol server — read-only spreadsheet tools for LLM
//! agents, served over HTTP or stdio.

pub mod config;
pub mod protocol;
pub mod repl;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_addr, resolve_data_dir};
pub use protocol::ProtocolHandler;
pub use tools::ToolCatalog;
pub use transport::StdioTransport;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
