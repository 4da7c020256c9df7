//! Workbook model consumed by the compiler.
//!
//! A [`Workbook`] is an ordered list of [`Sheet`]s with one of them marked
//! active. Each sheet is a [`CellSource`]: a title plus its cells in
//! row-major order.

use sheetfn_engine::engine::RawCell;

use crate::error::{Result, SheetfnError};

/// Anything that can hand the compiler a titled, row-major cell stream.
pub trait CellSource {
    fn title(&self) -> &str;

    /// Cells ordered by row, then column.
    fn cells(&self) -> Vec<RawCell>;
}

/// One sheet held in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sheet {
    title: String,
    cells: Vec<RawCell>,
}

impl Sheet {
    /// Build a sheet; cells are put into row-major order.
    pub fn new(title: &str, mut cells: Vec<RawCell>) -> Sheet {
        cells.sort_by_key(|c| (c.at.row, c.at.col));
        Sheet {
            title: title.to_string(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellSource for Sheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn cells(&self) -> Vec<RawCell> {
        self.cells.clone()
    }
}

/// Ordered sheets plus the active-sheet designation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    active: usize,
}

impl Workbook {
    /// Build a workbook whose first sheet is active.
    pub fn new(sheets: Vec<Sheet>) -> Result<Workbook> {
        if sheets.is_empty() {
            return Err(SheetfnError::EmptyWorkbook);
        }
        Ok(Workbook { sheets, active: 0 })
    }

    /// Mark the sheet called `name` as active.
    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let idx = self
            .sheets
            .iter()
            .position(|s| s.title == name)
            .ok_or_else(|| SheetfnError::SheetNotFound(name.to_string()))?;
        self.active = idx;
        Ok(())
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.title.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.title == name)
    }

    pub fn active_sheet(&self) -> &Sheet {
        &self.sheets[self.active]
    }
}
