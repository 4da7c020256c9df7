//! CSV/TSV import
//!
//! A CSV file is a single sheet named after the file stem. Row 1 of the file
//! is row 1 of the sheet; there is no header row.

use crate::error::Result;
use crate::workbook::{Sheet, Workbook};
use sheetfn_engine::engine::{CellRef, CellValue, FORMULA_MARKER, RawCell};
use std::path::Path;

/// Parse a CSV (or, with `b'\t'`, TSV) file into a one-sheet workbook.
pub fn parse_csv(path: &Path, delimiter: u8) -> Result<Workbook> {
    let content = std::fs::read_to_string(path)?;
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1");
    let cells = parse_csv_content(&content, delimiter)?;
    Workbook::new(vec![Sheet::new(title, cells)])
}

/// Parse CSV text into cells. Empty fields produce no cell.
pub fn parse_csv_content(content: &str, delimiter: u8) -> Result<Vec<RawCell>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut cells = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        for (col_idx, field) in record.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            let at = CellRef::new(col_idx as u32 + 1, row_idx as u32 + 1);
            cells.push(parse_csv_field(at, field));
        }
    }

    Ok(cells)
}

/// Parse a CSV field into an appropriate cell
/// - Starts with `=` -> formula
/// - Valid number -> Number (unless it has leading zeros like "007")
/// - TRUE/FALSE -> Bool
/// - Otherwise -> Text
pub(crate) fn parse_csv_field(at: CellRef, field: &str) -> RawCell {
    // Keep explicit surrounding whitespace (typically from quoted CSV fields).
    let trimmed = field.trim();
    if field != trimmed {
        return RawCell::literal(at, CellValue::text(field));
    }

    if trimmed.starts_with(FORMULA_MARKER) {
        return RawCell::formula(at, trimmed);
    }

    // Preserve strings that look like numbers but have leading zeros (e.g., "007", "00123")
    // unless they're just "0" or start with "0."
    if trimmed.starts_with('0')
        && trimmed.len() > 1
        && !trimmed.starts_with("0.")
        && trimmed.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
    {
        return RawCell::literal(at, CellValue::text(trimmed));
    }

    RawCell::from_input(at, trimmed)
}
