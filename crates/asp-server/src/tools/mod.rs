//! Built-in spreadsheet tools and the discovery catalog.

pub mod catalog;
pub mod read_range;
pub mod sheet_list;

use std::sync::Arc;

use asp_sheets::SpreadsheetBackend;

use crate::protocol::HandlerRegistryBuilder;

pub use catalog::ToolCatalog;
pub use read_range::ReadRangeHandler;
pub use sheet_list::SheetListHandler;

/// Register the handlers behind every built-in tool.
pub fn register_builtin(
    builder: HandlerRegistryBuilder,
    backend: Arc<dyn SpreadsheetBackend>,
) -> HandlerRegistryBuilder {
    builder
        .register(
            sheet_list::MESSAGE_TYPE,
            SheetListHandler::new(backend.clone()),
        )
        .register(read_range::MESSAGE_TYPE, ReadRangeHandler::new(backend))
}
