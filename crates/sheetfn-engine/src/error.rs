//! Error types for the sheetfn compiler core.

use thiserror::Error;

use rhai::EvalAltResult;

use crate::engine::{CellRef, Dialect};

/// Errors that can occur while compiling or evaluating a sheet
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed cell coordinate: {0:?}")]
    MalformedCoordinate(String),

    #[error("Circular dependency detected: {}", format_cycle(.cycle, .cells))]
    CircularDependency {
        /// Every formula cell that could not be scheduled, in scan order.
        cells: Vec<CellRef>,
        /// One concrete cycle among `cells`, first cell repeated at the end.
        cycle: Vec<CellRef>,
    },

    #[error("Cannot evaluate a unit emitted for {0}")]
    UnsupportedDialect(Dialect),

    #[error("Rhai error: {0}")]
    Rhai(
        #[from]
        #[source]
        Box<EvalAltResult>,
    ),
}

fn format_cycle(cycle: &[CellRef], cells: &[CellRef]) -> String {
    let path = if cycle.is_empty() { cells } else { cycle };
    path.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, EngineError>;
