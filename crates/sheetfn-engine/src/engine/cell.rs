//! Cell data structures for the compiler.
//!
//! - [`CellValue`] - A literal held by a cell (text, number, boolean or empty)
//! - [`RawCell`] - A cell as yielded by a cell source, before classification
//! - [`Cell`] - A classified cell: either a formula or a value

use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;

/// Leading character that marks formula text.
pub const FORMULA_MARKER: char = '=';

/// A literal cell value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }
}

/// What a cell source declares a cell to contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Formula,
    Literal,
}

/// A cell as read from a sheet: coordinate, declared kind and content.
/// Formula cells carry their text (marker included) as [`CellValue::Text`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    pub at: CellRef,
    pub kind: CellKind,
    pub value: CellValue,
}

impl RawCell {
    pub fn formula(at: CellRef, text: &str) -> RawCell {
        RawCell {
            at,
            kind: CellKind::Formula,
            value: CellValue::text(text),
        }
    }

    pub fn literal(at: CellRef, value: CellValue) -> RawCell {
        RawCell {
            at,
            kind: CellKind::Literal,
            value,
        }
    }

    /// Build a cell from user-style input: `=...` is a formula, numbers and
    /// booleans are typed literals, anything else is text.
    pub fn from_input(at: CellRef, input: &str) -> RawCell {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return RawCell::literal(at, CellValue::Empty);
        }
        if trimmed.starts_with(FORMULA_MARKER) {
            return RawCell::formula(at, trimmed);
        }
        // `str::parse` also accepts "inf" and "NaN"; those stay text.
        if let Some(n) = trimmed.parse::<f64>().ok().filter(|n| n.is_finite()) {
            return RawCell::literal(at, CellValue::Number(n));
        }
        match trimmed {
            "true" | "TRUE" => RawCell::literal(at, CellValue::Bool(true)),
            "false" | "FALSE" => RawCell::literal(at, CellValue::Bool(false)),
            _ => RawCell::literal(at, CellValue::text(trimmed)),
        }
    }
}

/// A classified cell. Never both a formula and a value.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// Formula text with the marker stripped.
    Formula { at: CellRef, text: String },
    Value { at: CellRef, value: CellValue },
}

impl Cell {
    pub fn at(&self) -> CellRef {
        match self {
            Cell::Formula { at, .. } | Cell::Value { at, .. } => *at,
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Cell::Formula { .. })
    }
}
