//! sheetfn-core - workbook model, cell sources and per-sheet compilation.

pub mod batch;
pub mod error;
pub mod storage;
pub mod workbook;

pub use batch::{SheetOutcome, SheetSelection, compile_workbook};
pub use error::{Result, SheetfnError};
pub use storage::open_workbook;
pub use workbook::{CellSource, Sheet, Workbook};

pub use sheetfn_engine::engine::CellRef;
