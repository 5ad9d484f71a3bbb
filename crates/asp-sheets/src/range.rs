//! A1-style range addressing.
//!
//! A range such as `A1:D100` names a rectangle of cells. Columns are base-26
//! letter labels with no zero digit (A=1 … Z=26, AA=27), rows are 1-based.
//! Parsing resolves both axes to zero-based half-open intervals:
//! rows `[row_start - 1, row_end)` and columns `[col(start), col(end) + 1)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{SheetError, SheetResult};

/// Zero-based, half-open rectangular bounds.
///
/// Bounds are not required to be ordered: a range whose start lies past its
/// end selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl CellRange {
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_end.saturating_sub(self.row_start)
    }

    pub fn col_count(&self) -> usize {
        self.col_end.saturating_sub(self.col_start)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.col_count() == 0
    }

    /// Spell these bounds as an A1 range, if they have a spelling.
    ///
    /// The inclusive end cell must exist, so both exclusive ends must be ≥ 1.
    pub fn to_a1(&self) -> Option<String> {
        if self.row_end == 0 || self.col_end == 0 {
            return None;
        }
        Some(format!(
            "{}{}:{}{}",
            column_label(self.col_start),
            self.row_start.checked_add(1)?,
            column_label(self.col_end - 1),
            self.row_end
        ))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_a1() {
            Some(a1) => f.write_str(&a1),
            None => write!(
                f,
                "rows {}..{}, cols {}..{}",
                self.row_start, self.row_end, self.col_start, self.col_end
            ),
        }
    }
}

impl FromStr for CellRange {
    type Err = SheetError;

    fn from_str(s: &str) -> SheetResult<Self> {
        parse_range(s)
    }
}

/// Parse an A1-style range string into zero-based half-open bounds.
///
/// Accepts exactly `[A-Za-z]+[0-9]+:[A-Za-z]+[0-9]+`, with no surrounding
/// whitespace. Row numbers must be ≥ 1.
pub fn parse_range(range: &str) -> SheetResult<CellRange> {
    let malformed = || SheetError::MalformedRange(range.to_string());

    let (start, end) = range.split_once(':').ok_or_else(malformed)?;
    let (start_col, start_row) = split_cell(start).ok_or_else(malformed)?;
    let (end_col, end_row) = split_cell(end).ok_or_else(malformed)?;

    let col_start = column_index(start_col).map_err(|_| malformed())?;
    let col_end = column_index(end_col)
        .ok()
        .and_then(|c| c.checked_add(1))
        .ok_or_else(malformed)?;

    Ok(CellRange {
        row_start: start_row - 1,
        row_end: end_row,
        col_start,
        col_end,
    })
}

/// Split a cell reference like `AB12` into its letters and its 1-based row.
fn split_cell(cell: &str) -> Option<(&str, usize)> {
    let digits_at = cell.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = cell.split_at(digits_at);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((letters, row))
}

/// Convert a column label to its zero-based index: A→0, Z→25, AA→26.
///
/// Lowercase letters are accepted.
pub fn column_index(label: &str) -> SheetResult<usize> {
    if label.is_empty() {
        return Err(SheetError::MalformedRange(label.to_string()));
    }

    let mut index: usize = 0;
    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(SheetError::MalformedRange(label.to_string()));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(digit))
            .ok_or_else(|| SheetError::MalformedRange(label.to_string()))?;
    }

    Ok(index - 1)
}

/// Convert a zero-based column index to its label: 0→A, 25→Z, 26→AA.
pub fn column_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index as u128 + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
