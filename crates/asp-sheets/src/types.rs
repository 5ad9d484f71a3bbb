//! Core data types for sheet cells, records, and errors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One row of a sliced table, keyed by the table's original column headers.
pub type Record = Map<String, Value>;

/// A typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Convert into a JSON value. Non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Integer(n) => Value::Number((*n).into()),
            CellValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            CellValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<&CellValue> for Value {
    fn from(cell: &CellValue) -> Self {
        cell.to_json()
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Integer(n) => write!(f, "{n}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Errors that can occur while addressing or reading sheets.
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    #[error("Malformed range '{0}': expected <COL><ROW>:<COL><ROW>, e.g. A1:D100")]
    MalformedRange(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type SheetResult<T> = Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_json() {
        assert_eq!(CellValue::Null.to_json(), Value::Null);
        assert_eq!(CellValue::Integer(30).to_json(), serde_json::json!(30));
        assert_eq!(CellValue::Float(2.5).to_json(), serde_json::json!(2.5));
        assert_eq!(CellValue::Bool(true).to_json(), serde_json::json!(true));
        assert_eq!(
            CellValue::Text("NY".to_string()).to_json(),
            serde_json::json!("NY")
        );
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(CellValue::Float(f64::NAN).to_json(), Value::Null);
        assert_eq!(CellValue::Float(f64::INFINITY).to_json(), Value::Null);
    }

    #[test]
    fn test_error_messages() {
        let err = SheetError::MalformedRange("A:B5".to_string());
        assert!(err.to_string().contains("A:B5"));

        let err = SheetError::TableNotFound("Sheet9".to_string());
        assert_eq!(err.to_string(), "Table not found: Sheet9");
    }
}
