//! CSV-backed sheets: one `.csv` file per table inside a root directory.

use std::path::{Path, PathBuf};

use crate::backend::SpreadsheetBackend;
use crate::table::Table;
use crate::types::{SheetError, SheetResult};

/// File extension of table files.
pub const CSV_EXTENSION: &str = "csv";

/// Tables stored as CSV files directly under one directory.
#[derive(Debug, Clone)]
pub struct CsvBackend {
    root: PathBuf,
}

impl CsvBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a table name to its file, refusing anything that could escape
    /// the root directory.
    fn table_path(&self, name: &str) -> SheetResult<PathBuf> {
        let escapes = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if escapes {
            return Err(SheetError::TableNotFound(name.to_string()));
        }

        let path = self.root.join(format!("{name}.{CSV_EXTENSION}"));
        if !path.is_file() {
            return Err(SheetError::TableNotFound(name.to_string()));
        }
        Ok(path)
    }
}

impl SpreadsheetBackend for CsvBackend {
    fn list_tables(&self) -> SheetResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().map_or(true, |e| e != CSV_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn load_table(&self, name: &str) -> SheetResult<Table> {
        let path = self.table_path(name)?;
        let content = read_file_as_utf8(&path)?;
        parse_csv(name, &content)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.root.display())
    }
}

/// Read a file as UTF-8, falling back to Windows-1252 for legacy exports.
pub fn read_file_as_utf8(path: &Path) -> SheetResult<String> {
    let bytes = std::fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            decoded.into_owned()
        }
    };
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Parse CSV text (first row is the header) into a typed table.
pub fn parse_csv(name: &str, content: &str) -> SheetResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }

    Ok(Table::from_raw(name, headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use serde_json::{json, Value};

    const PEOPLE: &str = "Name,Age,City\nAnn,30,NY\nBo,25,LA\nCy,40,SF\n";

    fn backend_with(files: &[(&str, &str)]) -> (tempfile::TempDir, CsvBackend) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        let backend = CsvBackend::new(dir.path());
        (dir, backend)
    }

    fn as_json(rows: Vec<crate::Record>) -> Value {
        Value::Array(rows.into_iter().map(Value::Object).collect())
    }

    #[test]
    fn test_list_tables_sorted_and_filtered() {
        let (dir, backend) = backend_with(&[
            ("Sheet2.csv", "a\n1\n"),
            ("Sheet1.csv", PEOPLE),
            ("notes.txt", "ignore me"),
            ("upper.CSV", "a\n"),
        ]);
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        assert_eq!(backend.list_tables().unwrap(), ["Sheet1", "Sheet2"]);
    }

    #[test]
    fn test_list_tables_missing_root() {
        let backend = CsvBackend::new("/nonexistent/asp/data/dir");
        assert!(matches!(backend.list_tables(), Err(SheetError::Io(_))));
    }

    #[test]
    fn test_read_range_people() {
        let (_dir, backend) = backend_with(&[("Sheet1.csv", PEOPLE)]);
        let rows = backend.read_range("Sheet1", "A1:B2").unwrap();
        assert_eq!(
            as_json(rows),
            json!([{"Name": "Ann", "Age": 30}, {"Name": "Bo", "Age": 25}])
        );
    }

    #[test]
    fn test_read_range_clipped() {
        let (_dir, backend) = backend_with(&[("Sheet1.csv", PEOPLE)]);
        let rows = backend.read_range("Sheet1", "A1:Z999").unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 3));
        assert_eq!(rows[2]["City"], json!("SF"));
    }

    #[test]
    fn test_read_range_missing_table() {
        let (_dir, backend) = backend_with(&[("Sheet1.csv", PEOPLE)]);
        match backend.read_range("Sheet9", "A1:B2") {
            Err(SheetError::TableNotFound(name)) => assert_eq!(name, "Sheet9"),
            other => panic!("expected TableNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_read_range_malformed() {
        let (_dir, backend) = backend_with(&[("Sheet1.csv", PEOPLE)]);
        for bad in ["A:B5", "1A:5B"] {
            assert!(matches!(
                backend.read_range("Sheet1", bad),
                Err(SheetError::MalformedRange(_))
            ));
        }
    }

    #[test]
    fn test_path_traversal_rejected() {
        let (dir, _) = backend_with(&[]);
        let inner = dir.path().join("inner");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(dir.path().join("secret.csv"), PEOPLE).unwrap();
        let backend = CsvBackend::new(&inner);

        for name in ["../secret", "..", "", "a/b", "a\\b", "."] {
            assert!(
                matches!(backend.load_table(name), Err(SheetError::TableNotFound(_))),
                "{name:?} should not resolve"
            );
        }
    }

    #[test]
    fn test_dotted_names_are_readable() {
        let (_dir, backend) = backend_with(&[("v1..final.csv", PEOPLE), ("..hidden.csv", PEOPLE)]);
        let listed = backend.list_tables().unwrap();
        assert_eq!(listed, ["..hidden", "v1..final"]);

        for name in &listed {
            let rows = backend.read_range(name, "A1:A1").unwrap();
            assert_eq!(rows[0]["Name"], json!("Ann"));
        }
    }

    #[test]
    fn test_windows_1252_fallback() {
        let (dir, backend) = backend_with(&[]);
        std::fs::write(dir.path().join("legacy.csv"), b"City\nM\xfcnchen\n").unwrap();
        let table = backend.load_table("legacy").unwrap();
        assert_eq!(table.rows[0][0], CellValue::Text("München".to_string()));
    }

    #[test]
    fn test_bom_stripped() {
        let (_dir, backend) = backend_with(&[("bom.csv", "\u{feff}Name,Age\nAnn,30\n")]);
        let table = backend.load_table("bom").unwrap();
        assert_eq!(table.headers, ["Name", "Age"]);
    }

    #[test]
    fn test_quoted_fields() {
        let table = parse_csv("q", "Name,Note\n\"Smith, J\",\"said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(table.rows[0][0], CellValue::Text("Smith, J".to_string()));
        assert_eq!(table.rows[0][1], CellValue::Text("said \"hi\"".to_string()));
    }

    #[test]
    fn test_header_only_file() {
        let table = parse_csv("empty", "a,b,c\n").unwrap();
        assert_eq!(table.col_count(), 3);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_describe() {
        let backend = CsvBackend::new("/srv/sheets");
        assert_eq!(backend.describe(), "csv:/srv/sheets");
    }
}
