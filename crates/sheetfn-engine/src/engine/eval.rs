//! Rhai evaluation of compiled units.
//!
//! A unit emitted for the Rhai dialect is an ordinary Rhai function, so it can
//! be run in-process: compile the source, call the function with an input map
//! and get the computed map back. Used by `--run` and by tests that check the
//! emitted code computes what the sheet says.

use rhai::{Dynamic, Engine, EvalAltResult, Map, Scope};

use super::dialect::Dialect;
use crate::compile::CompiledUnit;
use crate::error::{EngineError, Result};

/// Create a Rhai engine for running compiled units.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();
    // Units are straight-line code; deep nesting means a runaway formula.
    engine.set_max_expr_depths(256, 64);
    engine
}

/// Call the unit's function with `input` and return the computed map.
pub fn evaluate_unit(unit: &CompiledUnit, input: Map) -> Result<Map> {
    ensure_rhai(unit)?;
    let engine = create_engine();
    let ast = engine
        .compile(&unit.source)
        .map_err(Box::<EvalAltResult>::from)?;

    let mut scope = Scope::new();
    let computed = engine.call_fn::<Map>(&mut scope, &ast, &unit.name, (input,))?;
    Ok(computed)
}

/// Evaluate the unit's example-input literal into a map.
pub fn example_input(unit: &CompiledUnit) -> Result<Map> {
    ensure_rhai(unit)?;
    let engine = create_engine();
    Ok(engine.eval_expression::<Map>(&unit.example_input)?)
}

/// Run the unit against its own example input.
pub fn run_example(unit: &CompiledUnit) -> Result<Map> {
    let input = example_input(unit)?;
    evaluate_unit(unit, input)
}

fn ensure_rhai(unit: &CompiledUnit) -> Result<()> {
    if unit.dialect != Dialect::Rhai {
        return Err(EngineError::UnsupportedDialect(unit.dialect));
    }
    Ok(())
}

/// Format a computed map as `{A3: 5, A4: 10}`.
pub fn format_map(map: &Map) -> String {
    let entries = map
        .iter()
        .map(|(k, v)| format!("{}: {}", k, format_dynamic(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", entries)
}

/// Format a Dynamic value for display.
pub fn format_dynamic(value: &Dynamic) -> String {
    if value.is_unit() {
        "()".to_string()
    } else if let Ok(n) = value.as_float() {
        format_number(n)
    } else if let Ok(n) = value.as_int() {
        n.to_string()
    } else if let Ok(b) = value.as_bool() {
        b.to_string()
    } else if value.is_string() {
        format!("{:?}", value.to_string())
    } else {
        value.to_string()
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}
