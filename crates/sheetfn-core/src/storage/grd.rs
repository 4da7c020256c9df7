//! Parser for the .grd text format
//!
//! ```text
//! # comment
//! [Inputs]*
//! A1: 2
//! A2: "label"
//! [Totals]
//! B1: =A1 * 2
//! ```
//!
//! A `[Name]` header starts a new sheet; a trailing `*` marks it active.
//! Cells before the first header belong to `Sheet1`.

use crate::error::{Result, SheetfnError};
use crate::workbook::{Sheet, Workbook};
use sheetfn_engine::engine::{CellRef, CellValue, FORMULA_MARKER, RawCell};
use std::fs;
use std::path::Path;

const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Parse a .grd file into a workbook
pub fn parse_grd(path: &Path) -> Result<Workbook> {
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

/// Parse .grd content from a string
pub fn parse_grd_content(content: &str) -> Result<Workbook> {
    let mut sheets: Vec<(String, Vec<RawCell>)> = Vec::new();
    let mut active: Option<String> = None;

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let (name, is_active) = parse_header(header, line_num + 1)?;
            if sheets.iter().any(|(n, _)| *n == name) {
                return Err(SheetfnError::Parse {
                    line: line_num + 1,
                    message: format!("Duplicate sheet name: {}", name),
                });
            }
            if is_active {
                active = Some(name.clone());
            }
            sheets.push((name, Vec::new()));
            continue;
        }

        // Parse "CELLREF: VALUE" format
        let Some((cell_ref_str, value_str)) = line.split_once(':') else {
            return Err(SheetfnError::Parse {
                line: line_num + 1,
                message: "Expected 'CELLREF: VALUE' format".to_string(),
            });
        };

        let cell_ref_str = cell_ref_str.trim();
        let at = CellRef::parse(cell_ref_str).map_err(|_| SheetfnError::Parse {
            line: line_num + 1,
            message: format!("Invalid cell reference: {}", cell_ref_str),
        })?;

        let cell = parse_cell_value(at, value_str, line_num + 1)?;
        if sheets.is_empty() {
            sheets.push((DEFAULT_SHEET_NAME.to_string(), Vec::new()));
        }
        if let Some((_, cells)) = sheets.last_mut() {
            cells.push(cell);
        }
    }

    if sheets.is_empty() {
        sheets.push((DEFAULT_SHEET_NAME.to_string(), Vec::new()));
    }

    let mut workbook = Workbook::new(
        sheets
            .into_iter()
            .map(|(name, cells)| Sheet::new(&name, cells))
            .collect(),
    )?;
    if let Some(name) = active {
        workbook.set_active(&name)?;
    }
    Ok(workbook)
}

/// Parse the remainder of a `[Name]` or `[Name]*` line.
fn parse_header(header: &str, line_num: usize) -> Result<(String, bool)> {
    let (name, rest) = header.split_once(']').ok_or_else(|| SheetfnError::Parse {
        line: line_num,
        message: "Unterminated sheet header".to_string(),
    })?;
    let is_active = match rest.trim() {
        "" => false,
        "*" => true,
        other => {
            return Err(SheetfnError::Parse {
                line: line_num,
                message: format!("Unexpected text after sheet header: {}", other),
            });
        }
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(SheetfnError::Parse {
            line: line_num,
            message: "Empty sheet name".to_string(),
        });
    }
    Ok((name.to_string(), is_active))
}

/// Parse a cell value string into a RawCell
fn parse_cell_value(at: CellRef, value: &str, line_num: usize) -> Result<RawCell> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(RawCell::literal(at, CellValue::Empty));
    }

    // Formula: starts with '='
    if value.starts_with(FORMULA_MARKER) {
        return Ok(RawCell::formula(at, value));
    }

    // Quoted string: starts and ends with '"'
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        let text = &value[1..value.len() - 1];
        return Ok(RawCell::literal(at, CellValue::Text(unescape_grd_text(text))));
    }

    match value {
        "true" => return Ok(RawCell::literal(at, CellValue::Bool(true))),
        "false" => return Ok(RawCell::literal(at, CellValue::Bool(false))),
        _ => {}
    }

    // Try to parse as number
    if let Some(n) = value.parse::<f64>().ok().filter(|n| n.is_finite()) {
        return Ok(RawCell::literal(at, CellValue::Number(n)));
    }

    Err(SheetfnError::Parse {
        line: line_num,
        message: format!("Invalid value: {}. Use quotes for text.", value),
    })
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            } else {
                out.push('\\');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
