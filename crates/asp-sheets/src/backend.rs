//! The spreadsheet backend capability.

use crate::range::parse_range;
use crate::table::Table;
use crate::types::{Record, SheetResult};

/// A read-only source of named tables.
///
/// Implementations must be safe to share across threads: every call loads
/// its own copy of the data, so no call observes another's state.
pub trait SpreadsheetBackend: Send + Sync {
    /// Names of all available tables, sorted ascending.
    fn list_tables(&self) -> SheetResult<Vec<String>>;

    /// Load a whole table into memory.
    ///
    /// Fails with [`SheetError::TableNotFound`](crate::SheetError::TableNotFound)
    /// when no table has that name.
    fn load_table(&self, name: &str) -> SheetResult<Table>;

    /// Short human-readable description of where tables come from.
    fn describe(&self) -> String;

    /// Read the rectangle `range` (A1 notation) from table `name`.
    fn read_range(&self, name: &str, range: &str) -> SheetResult<Vec<Record>> {
        let table = self.load_table(name)?;
        let bounds = parse_range(range)?;
        let rows = table.slice(&bounds);
        tracing::debug!(
            "Read {} row(s) from '{name}' range {bounds} ({}x{} table)",
            rows.len(),
            table.row_count(),
            table.col_count()
        );
        Ok(rows)
    }
}
