//! sheetfn-engine - compiles a sheet's formula cells into a pure function.
//!
//! The pipeline runs in fixed stages: classification, reference extraction,
//! dependency graph, scheduling, rewriting and emission. [`compile_sheet`]
//! drives all of them for one sheet.

pub mod compile;
pub mod engine;
pub mod error;

pub use compile::{CompileOptions, CompiledUnit, compile_sheet};
pub use error::{EngineError, Result};
