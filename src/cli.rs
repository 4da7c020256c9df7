use clap::Parser;
use std::path::PathBuf;

use sheetfn_core::SheetSelection;
use sheetfn_engine::engine::{CellRef, Dialect};

#[derive(Debug, Parser)]
#[command(name = "sheetfn")]
#[command(about = "Compile spreadsheet formulas into pure functions")]
#[command(version)]
#[command(after_help = "\
Examples:
  sheetfn model.xlsx
  sheetfn model.xlsx --sheet Inputs,Totals --include-test-code
  sheetfn budget.grd --dialect rhai --run
  sheetfn data.csv --min-cell A1 --max-cell D20")]
pub struct Cli {
    /// Workbook to compile (.xlsx, .xlsm, .grd, .csv, .tsv)
    pub file: PathBuf,

    /// Comma-separated sheet names (default: every sheet)
    #[arg(long, value_name = "NAMES", conflicts_with = "active")]
    pub sheet: Option<String>,

    /// Only compile the workbook's active sheet
    #[arg(long)]
    pub active: bool,

    /// Ignore cells above/left of this coordinate
    #[arg(long, alias = "min_cell", value_name = "CELL")]
    pub min_cell: Option<CellRef>,

    /// Ignore cells below/right of this coordinate
    #[arg(long, alias = "max_cell", value_name = "CELL")]
    pub max_cell: Option<CellRef>,

    /// Append code that calls each function with its example input
    #[arg(long)]
    pub include_test_code: bool,

    /// Target language: js or rhai
    #[arg(long, value_name = "DIALECT")]
    pub dialect: Option<Dialect>,

    /// Evaluate each unit against its example input (rhai only)
    #[arg(long)]
    pub run: bool,

    /// Config file (default: <config dir>/sheetfn/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn selection(&self) -> SheetSelection {
        if self.active {
            return SheetSelection::Active;
        }
        match self.sheet.as_deref() {
            Some(list) => SheetSelection::from_list(list),
            None => SheetSelection::All,
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
