//! Compiler stages.
//!
//! - [`CellRef`], [`CellRange`] - Coordinate parsing (A1 notation ↔ column/row) and range filter
//! - [`RawCell`], [`Cell`], [`CellValue`] - Cells before and after classification
//! - [`classify`] - Split cells into formulas and values
//! - [`extract_references`] - Find coordinate tokens in formula text
//! - [`DependencyGraph`] - Formula-to-formula edges plus external inputs
//! - [`schedule`] - Evaluation order (Kahn), with [`find_cycle`] for reporting
//! - [`rewrite_formula`] - Replace references with namespace accesses
//! - [`emit_unit`], [`emit_example_input`] - Assemble the output text
//! - [`Dialect`] - Target language spelling
//! - [`eval`] - Run Rhai units in-process

mod cell;
mod cell_ref;
mod classify;
mod cycle;
mod deps;
mod dialect;
mod emit;
pub mod eval;
mod refs;
mod rewrite;
mod schedule;

pub use cell::{Cell, CellKind, CellValue, FORMULA_MARKER, RawCell};
pub use cell_ref::{CellRange, CellRef};
pub use classify::{Classified, classify};
pub use cycle::{find_cycle, first_cycle};
pub use deps::DependencyGraph;
pub use dialect::Dialect;
pub use emit::{
    DEFAULT_FUNCTION_NAME, emit_example_input, emit_unit, sanitize_identifier,
    sanitize_identifier_or,
};
pub use refs::{Reference, extract_references};
pub use rewrite::{Namespaces, rewrite_formula};
pub use schedule::schedule;
