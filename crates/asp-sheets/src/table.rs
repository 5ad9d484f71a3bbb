//! In-memory tables and rectangular slicing.

use serde_json::Value;

use crate::range::CellRange;
use crate::types::{CellValue, Record};

/// Strings read as missing values.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A named, rectangular grid of typed cells with one header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

impl Table {
    /// Build a table from raw string cells, inferring a type per column.
    ///
    /// Headers are normalized: blanks become `Unnamed: <i>` and repeats get
    /// `.1`, `.2`, … suffixes. Short rows are padded with nulls and cells
    /// past the header width are dropped.
    pub fn from_raw(name: impl Into<String>, headers: Vec<String>, raw: Vec<Vec<String>>) -> Self {
        let name = name.into();
        let headers = normalize_headers(headers);
        let width = headers.len();

        let kinds: Vec<ColumnKind> = (0..width)
            .map(|c| infer_kind(raw.iter().filter_map(|row| row.get(c).map(String::as_str))))
            .collect();

        let rows = raw
            .iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() > width {
                    tracing::debug!(
                        "Table '{name}' row {}: dropping {} field(s) past the header",
                        i + 1,
                        row.len() - width
                    );
                }
                kinds
                    .iter()
                    .enumerate()
                    .map(|(c, kind)| match row.get(c) {
                        Some(raw) => convert(raw, *kind),
                        None => CellValue::Null,
                    })
                    .collect()
            })
            .collect();

        Self {
            name,
            headers,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    /// Slice rows first, then columns, by position.
    ///
    /// Bounds past the table's extent are clipped and reversed bounds select
    /// nothing. Each record is keyed by the original header at that position.
    pub fn slice(&self, range: &CellRange) -> Vec<Record> {
        let (row_start, row_end) = clip(range.row_start, range.row_end, self.row_count());
        let (col_start, col_end) = clip(range.col_start, range.col_end, self.col_count());

        self.rows[row_start..row_end]
            .iter()
            .map(|row| {
                (col_start..col_end)
                    .map(|c| {
                        let value = row.get(c).map_or(Value::Null, Value::from);
                        (self.headers[c].clone(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

fn clip(start: usize, end: usize, len: usize) -> (usize, usize) {
    let end = end.min(len);
    let start = start.min(end);
    (start, end)
}

fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for (i, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.push(candidate);
    }
    seen
}

fn is_na(raw: &str) -> bool {
    NA_MARKERS.contains(&raw)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> ColumnKind {
    let present = cells.filter(|raw| !is_na(raw));
    if present.clone().all(|raw| raw.trim().parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present.clone().all(|raw| parse_float(raw).is_some()) {
        ColumnKind::Float
    } else if present.clone().all(|raw| parse_bool(raw).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

fn convert(raw: &str, kind: ColumnKind) -> CellValue {
    if is_na(raw) {
        return CellValue::Null;
    }
    let parsed = match kind {
        ColumnKind::Integer => raw.trim().parse().ok().map(CellValue::Integer),
        ColumnKind::Float => parse_float(raw).map(CellValue::Float),
        ColumnKind::Bool => parse_bool(raw).map(CellValue::Bool),
        ColumnKind::Text => None,
    };
    parsed.unwrap_or_else(|| CellValue::Text(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn people() -> Table {
        Table::from_raw(
            "Sheet1",
            strings(&["Name", "Age", "City"]),
            vec![
                strings(&["Ann", "30", "NY"]),
                strings(&["Bo", "25", "LA"]),
                strings(&["Cy", "40", "SF"]),
            ],
        )
    }

    #[test]
    fn test_slice_top_left() {
        let rows = people().slice(&CellRange::new(0, 2, 0, 2));
        assert_eq!(
            Value::from(rows.into_iter().map(Value::Object).collect::<Vec<_>>()),
            json!([{"Name": "Ann", "Age": 30}, {"Name": "Bo", "Age": 25}])
        );
    }

    #[test]
    fn test_slice_keeps_header_order() {
        let rows = people().slice(&CellRange::new(0, 1, 0, 3));
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, ["Name", "Age", "City"]);
    }

    #[test]
    fn test_slice_inner_block_uses_original_headers() {
        let rows = people().slice(&CellRange::new(1, 3, 1, 3));
        assert_eq!(rows.len(), 2);
        assert_eq!(Value::Object(rows[0].clone()), json!({"Age": 25, "City": "LA"}));
        assert_eq!(Value::Object(rows[1].clone()), json!({"Age": 40, "City": "SF"}));
    }

    #[test]
    fn test_slice_clips_to_extent() {
        let rows = people().slice(&CellRange::new(0, 999, 0, 26));
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn test_slice_entirely_outside() {
        assert!(people().slice(&CellRange::new(10, 20, 0, 3)).is_empty());
        let rows = people().slice(&CellRange::new(0, 2, 5, 9));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_slice_reversed_is_empty() {
        assert!(people().slice(&CellRange::new(2, 0, 0, 3)).is_empty());
        let rows = people().slice(&CellRange::new(0, 3, 2, 0));
        assert!(rows.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_column_inference() {
        let table = Table::from_raw(
            "mixed",
            strings(&["int", "float", "flag", "text", "gappy"]),
            vec![
                strings(&["1", "1.5", "True", "x", "7"]),
                strings(&["-2", "2", "false", "10", ""]),
                strings(&["3", "NaN", "TRUE", "NA", "9"]),
            ],
        );
        assert_eq!(
            table.rows[0],
            vec![
                CellValue::Integer(1),
                CellValue::Float(1.5),
                CellValue::Bool(true),
                CellValue::Text("x".to_string()),
                CellValue::Integer(7),
            ]
        );
        assert_eq!(table.rows[1][1], CellValue::Float(2.0));
        assert_eq!(table.rows[1][3], CellValue::Text("10".to_string()));
        assert_eq!(table.rows[1][4], CellValue::Null);
        assert_eq!(table.rows[2][1], CellValue::Null);
        assert_eq!(table.rows[2][3], CellValue::Null);
    }

    #[test]
    fn test_non_finite_strings_stay_text() {
        let table = Table::from_raw(
            "t",
            strings(&["v"]),
            vec![strings(&["1.0"]), strings(&["inf"])],
        );
        assert_eq!(table.rows[1][0], CellValue::Text("inf".to_string()));
    }

    #[test]
    fn test_header_normalization() {
        let table = Table::from_raw(
            "t",
            strings(&["a", "", "a", "a", " "]),
            vec![],
        );
        assert_eq!(
            table.headers,
            ["a", "Unnamed: 1", "a.1", "a.2", "Unnamed: 4"]
        );
    }

    #[test]
    fn test_ragged_rows() {
        let table = Table::from_raw(
            "t",
            strings(&["a", "b"]),
            vec![strings(&["1"]), strings(&["2", "3", "extra"])],
        );
        assert_eq!(table.rows[0], vec![CellValue::Integer(1), CellValue::Null]);
        assert_eq!(
            table.rows[1],
            vec![CellValue::Integer(2), CellValue::Integer(3)]
        );
    }

    #[test]
    fn test_empty_column_is_integer_of_nulls() {
        let table = Table::from_raw("t", strings(&["a"]), vec![strings(&[""])]);
        assert_eq!(table.rows[0][0], CellValue::Null);
    }
}
