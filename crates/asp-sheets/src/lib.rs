//! asp-sheets — spreadsheet core for the Agent Spreadsheet Protocol: A1 range
//! addressing, typed tables, and CSV-backed sheets.

pub mod backend;
pub mod csv_backend;
pub mod range;
pub mod table;
pub mod types;

pub use backend::SpreadsheetBackend;
pub use csv_backend::CsvBackend;
pub use range::{column_index, column_label, parse_range, CellRange};
pub use table::Table;
pub use types::*;
