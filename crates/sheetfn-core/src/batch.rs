//! Per-sheet compilation of a workbook.
//!
//! Every requested sheet is compiled on its own. A sheet that fails (unknown
//! name, circular formulas) is reported in its [`SheetOutcome`] and has no
//! effect on the others. Sheets are independent, so they compile in parallel;
//! outcomes keep the requested order.

use rayon::prelude::*;

use sheetfn_engine::{CompileOptions, CompiledUnit, compile_sheet};

use crate::error::{Result, SheetfnError};
use crate::workbook::{CellSource, Workbook};

/// Result of compiling one sheet.
#[derive(Debug)]
pub struct SheetOutcome {
    pub sheet: String,
    pub result: Result<CompiledUnit>,
}

impl SheetOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Which sheets to compile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SheetSelection {
    /// Every sheet, in workbook order.
    #[default]
    All,
    /// Only the active sheet.
    Active,
    /// These names, in this order.
    Named(Vec<String>),
}

impl SheetSelection {
    /// Parse a comma-separated list of names (`"Inputs, Model"`).
    pub fn from_list(list: &str) -> SheetSelection {
        let names: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if names.is_empty() {
            SheetSelection::All
        } else {
            SheetSelection::Named(names)
        }
    }

    fn resolve(&self, workbook: &Workbook) -> Vec<String> {
        match self {
            SheetSelection::All => workbook.sheet_names(),
            SheetSelection::Active => vec![workbook.active_sheet().title().to_string()],
            SheetSelection::Named(names) => names.clone(),
        }
    }
}

/// Compile the selected sheets of `workbook`.
pub fn compile_workbook(
    workbook: &Workbook,
    selection: &SheetSelection,
    options: &CompileOptions,
) -> Vec<SheetOutcome> {
    let names = selection.resolve(workbook);
    tracing::info!(sheets = names.len(), "compiling workbook");

    names
        .into_par_iter()
        .map(|name| {
            let result = compile_one(workbook, &name, options);
            if let Err(e) = &result {
                tracing::warn!(sheet = name.as_str(), error = %e, "sheet failed");
            }
            SheetOutcome {
                sheet: name,
                result,
            }
        })
        .collect()
}

fn compile_one(workbook: &Workbook, name: &str, options: &CompileOptions) -> Result<CompiledUnit> {
    let sheet = workbook
        .sheet(name)
        .ok_or_else(|| SheetfnError::SheetNotFound(name.to_string()))?;
    Ok(compile_sheet(sheet.title(), sheet.cells(), options)?)
}
