//! Cell classification.
//!
//! Splits a stream of raw cells into formula cells and value cells, dropping
//! anything outside the configured range. Scan order is kept because the
//! scheduler uses it as its tie-break.

use std::collections::HashMap;

use super::cell::{Cell, CellKind, CellValue, FORMULA_MARKER, RawCell};
use super::cell_ref::{CellRange, CellRef};

/// Classified cells of one sheet, in scan order.
#[derive(Clone, Debug, Default)]
pub struct Classified {
    cells: Vec<Cell>,
    index: HashMap<CellRef, usize>,
}

impl Classified {
    /// Formula cells as `(coordinate, text)` in scan order.
    pub fn formulas(&self) -> impl Iterator<Item = (CellRef, &str)> + '_ {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Formula { at, text } => Some((*at, text.as_str())),
            Cell::Value { .. } => None,
        })
    }

    pub fn formula_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_formula()).count()
    }

    pub fn value_count(&self) -> usize {
        self.cells.len() - self.formula_count()
    }

    pub fn get(&self, at: &CellRef) -> Option<&Cell> {
        self.index.get(at).map(|&i| &self.cells[i])
    }

    pub fn is_formula(&self, at: &CellRef) -> bool {
        self.get(at).is_some_and(Cell::is_formula)
    }

    /// The literal of a value cell, if `at` is one.
    pub fn value(&self, at: &CellRef) -> Option<&CellValue> {
        match self.get(at)? {
            Cell::Value { value, .. } => Some(value),
            Cell::Formula { .. } => None,
        }
    }

    fn insert(&mut self, cell: Cell) {
        let at = cell.at();
        if let Some(&i) = self.index.get(&at) {
            tracing::warn!(cell = %at, "duplicate cell coordinate; keeping the later cell");
            self.cells[i] = cell;
        } else {
            self.index.insert(at, self.cells.len());
            self.cells.push(cell);
        }
    }
}

/// Classify `cells`, skipping any outside `range` when one is given.
pub fn classify<I>(cells: I, range: Option<&CellRange>) -> Classified
where
    I: IntoIterator<Item = RawCell>,
{
    let mut out = Classified::default();
    let mut skipped = 0usize;

    for raw in cells {
        if let Some(range) = range
            && !range.contains(&raw.at)
        {
            skipped += 1;
            continue;
        }
        out.insert(classify_cell(raw));
    }

    tracing::debug!(
        formulas = out.formula_count(),
        values = out.value_count(),
        skipped,
        "classified cells"
    );
    out
}

fn classify_cell(raw: RawCell) -> Cell {
    let RawCell { at, kind, value } = raw;
    match (kind, value) {
        (CellKind::Formula, CellValue::Text(text)) if text.starts_with(FORMULA_MARKER) => {
            Cell::Formula {
                at,
                text: text[FORMULA_MARKER.len_utf8()..].to_string(),
            }
        }
        (_, value) => Cell::Value { at, value },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> CellRef {
        CellRef::parse(s).unwrap()
    }

    fn sheet() -> Vec<RawCell> {
        vec![
            RawCell::literal(at("A1"), CellValue::Number(2.0)),
            RawCell::formula(at("B1"), "=A1*2"),
            RawCell::literal(at("A2"), CellValue::text("x")),
            RawCell::formula(at("B2"), "=B1+A2"),
            RawCell::formula(at("D4"), "=1"),
        ]
    }

    #[test]
    fn test_partitions_formulas_and_values() {
        let classified = classify(sheet(), None);
        let formulas: Vec<_> = classified.formulas().collect();
        assert_eq!(
            formulas,
            vec![(at("B1"), "A1*2"), (at("B2"), "B1+A2"), (at("D4"), "1")]
        );
        assert_eq!(classified.value_count(), 2);
        assert_eq!(classified.value(&at("A1")), Some(&CellValue::Number(2.0)));
        assert!(classified.is_formula(&at("B1")));
        assert!(!classified.is_formula(&at("A1")));
        assert!(!classified.is_formula(&at("Z9")));
    }

    #[test]
    fn test_formula_kind_without_marker_is_a_value() {
        let cells = vec![RawCell::formula(at("A1"), "SUM(B1)")];
        let classified = classify(cells, None);
        assert_eq!(classified.formula_count(), 0);
        assert_eq!(classified.value(&at("A1")), Some(&CellValue::text("SUM(B1)")));
    }

    #[test]
    fn test_literal_text_with_marker_is_not_a_formula() {
        let cells = vec![RawCell::literal(at("A1"), CellValue::text("=B1"))];
        let classified = classify(cells, None);
        assert_eq!(classified.formula_count(), 0);
    }

    #[test]
    fn test_range_skips_cells_outside_box() {
        let range = CellRange::new(Some(at("A1")), Some(at("B2")));
        let classified = classify(sheet(), Some(&range));
        assert_eq!(classified.formula_count(), 2);
        assert!(classified.get(&at("D4")).is_none());
    }

    #[test]
    fn test_duplicate_coordinate_keeps_later_cell_in_first_position() {
        let cells = vec![
            RawCell::formula(at("A1"), "=1"),
            RawCell::formula(at("A2"), "=2"),
            RawCell::formula(at("A1"), "=3"),
        ];
        let classified = classify(cells, None);
        let formulas: Vec<_> = classified.formulas().collect();
        assert_eq!(formulas, vec![(at("A1"), "3"), (at("A2"), "2")]);
    }
}
