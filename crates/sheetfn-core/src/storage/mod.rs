//! Cell sources: .grd text, CSV/TSV and XLSX workbooks

mod delimited;
mod grd;
mod xlsx;

pub use delimited::{parse_csv, parse_csv_content};
pub use grd::{parse_grd, parse_grd_content};
pub use xlsx::parse_xlsx;

use crate::error::{Result, SheetfnError};
use crate::workbook::Workbook;
use std::path::Path;

/// Open a workbook, choosing the reader by file extension.
pub fn open_workbook(path: &Path) -> Result<Workbook> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    tracing::debug!(path = %path.display(), format = ext.as_str(), "opening workbook");
    match ext.as_str() {
        "grd" => parse_grd(path),
        "csv" => parse_csv(path, b','),
        "tsv" => parse_csv(path, b'\t'),
        "xlsx" | "xlsm" => parse_xlsx(path),
        _ => Err(SheetfnError::UnsupportedFormat(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let err = open_workbook(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, SheetfnError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_workbook(&dir.path().join("missing.grd")).unwrap_err();
        assert!(matches!(err, SheetfnError::Io(_)));
    }
}
