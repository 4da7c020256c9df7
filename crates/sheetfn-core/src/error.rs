//! Error types for sheetfn core.

use thiserror::Error;

use sheetfn_engine::EngineError;

/// Errors that can occur while reading workbooks or compiling their sheets
#[derive(Error, Debug)]
pub enum SheetfnError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Workbook has no sheets")]
    EmptyWorkbook,

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type Result<T> = std::result::Result<T, SheetfnError>;
