//! XLSX import via calamine.
//!
//! Values come from the worksheet range and formulas from the formula range;
//! where both exist the formula wins. The first sheet is the active one.

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::workbook::{Sheet, Workbook};
use sheetfn_engine::engine::{CellRef, CellValue, FORMULA_MARKER, RawCell};

/// Read every sheet of an `.xlsx` workbook.
pub fn parse_xlsx(path: &Path) -> Result<Workbook> {
    let mut workbook: Xlsx<BufReader<File>> = open_workbook(path)?;
    let names = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in &names {
        let _span = tracing::debug_span!("xlsx_load_sheet", sheet = name.as_str()).entered();
        let values = workbook.worksheet_range(name)?;
        let formulas = match workbook.worksheet_formula(name) {
            Ok(range) => Some(range),
            Err(e) => {
                tracing::warn!(sheet = name.as_str(), error = %e, "could not read formulas");
                None
            }
        };
        sheets.push(Sheet::new(name, range_to_cells(&values, formulas.as_ref())));
    }

    Workbook::new(sheets)
}

fn convert_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Text(e.to_string()),
        // Excel serial number, as stored in the file.
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn range_to_cells(values: &Range<Data>, formulas: Option<&Range<String>>) -> Vec<RawCell> {
    let mut cells: BTreeMap<(u32, u32), RawCell> = BTreeMap::new();

    let (start_row, start_col) = values.start().unwrap_or_default();
    for (row, col, val) in values.used_cells() {
        // calamine is 0-based and relative to the range start.
        let at = CellRef::new(col as u32 + start_col + 1, row as u32 + start_row + 1);
        let value = match val {
            Data::String(s) if s.is_empty() => continue,
            Data::Empty => continue,
            other => convert_value(other),
        };
        cells.insert((at.row, at.col), RawCell::literal(at, value));
    }

    if let Some(frm_range) = formulas {
        let (start_row, start_col) = frm_range.start().unwrap_or_default();
        for (row, col, formula) in frm_range.used_cells() {
            if formula.is_empty() {
                continue;
            }
            let at = CellRef::new(col as u32 + start_col + 1, row as u32 + start_row + 1);
            // calamine drops the leading '='.
            let text = if formula.starts_with(FORMULA_MARKER) {
                formula.clone()
            } else {
                format!("{}{}", FORMULA_MARKER, formula)
            };
            cells.insert((at.row, at.col), RawCell::formula(at, &text));
        }
    }

    cells.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetfn_engine::engine::CellKind;

    #[test]
    fn test_convert_value() {
        assert_eq!(convert_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            convert_value(&Data::String("x".to_string())),
            CellValue::text("x")
        );
        assert_eq!(convert_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_range_to_cells_merges_formulas() {
        let mut values: Range<Data> = Range::new((0, 0), (2, 1));
        values.set_value((0, 0), Data::Float(2.0));
        values.set_value((1, 0), Data::Float(3.0));
        values.set_value((2, 0), Data::Float(5.0)); // cached result of the formula

        let mut formulas: Range<String> = Range::new((2, 0), (2, 0));
        formulas.set_value((2, 0), "A1+A2".to_string());

        let cells = range_to_cells(&values, Some(&formulas));
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[2].at, CellRef::parse("A3").unwrap());
        assert_eq!(cells[2].kind, CellKind::Formula);
        assert_eq!(cells[2].value, CellValue::text("=A1+A2"));
    }

    #[test]
    fn test_range_to_cells_offset_range() {
        let mut values: Range<Data> = Range::new((4, 2), (4, 2));
        values.set_value((4, 2), Data::String("hi".to_string()));
        let cells = range_to_cells(&values, None);
        assert_eq!(cells[0].at, CellRef::parse("C5").unwrap());
    }
}
