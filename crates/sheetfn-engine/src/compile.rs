//! Sheet compilation pipeline.
//!
//! Runs the stages in order: classify → graph (with reference extraction) →
//! schedule → rewrite → emit. Each call is independent; nothing is cached
//! between sheets.

use std::collections::BTreeMap;

use crate::engine::{
    CellRange, CellRef, CellValue, DEFAULT_FUNCTION_NAME, DependencyGraph, Dialect, Namespaces,
    RawCell, classify, emit_example_input, emit_unit, rewrite_formula, sanitize_identifier_or,
    schedule,
};
use crate::error::Result;

/// Knobs for one compilation.
#[derive(Clone, Debug, PartialEq)]
pub struct CompileOptions {
    pub dialect: Dialect,
    pub namespaces: Namespaces,
    /// Cells outside this box are ignored entirely.
    pub range: Option<CellRange>,
    /// Function name when the sheet title has no usable characters.
    pub default_function_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            dialect: Dialect::default(),
            namespaces: Namespaces::default(),
            range: None,
            default_function_name: DEFAULT_FUNCTION_NAME.to_string(),
        }
    }
}

/// The compiled form of one sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledUnit {
    /// Function name, sanitized from the sheet title.
    pub name: String,
    /// Full function source.
    pub source: String,
    /// Map literal of the referenced input values.
    pub example_input: String,
    /// Formula cells in evaluation order.
    pub order: Vec<CellRef>,
    /// Referenced value cells, sorted by coordinate string.
    pub inputs: Vec<(String, CellValue)>,
    pub dialect: Dialect,
}

impl CompiledUnit {
    /// Code that binds the example input and prints the unit's result.
    pub fn harness(&self) -> String {
        self.dialect.harness(&self.name, &self.example_input)
    }
}

/// Compile one sheet's cells into a unit named after `title`.
pub fn compile_sheet<I>(title: &str, cells: I, options: &CompileOptions) -> Result<CompiledUnit>
where
    I: IntoIterator<Item = RawCell>,
{
    let _span = tracing::debug_span!("compile_sheet", sheet = title).entered();
    let dialect = options.dialect;

    let classified = classify(cells, options.range.as_ref());
    let graph = DependencyGraph::build(&classified);
    let order = schedule(&graph)?;

    let assignments: Vec<(CellRef, String)> = order
        .iter()
        .map(|at| {
            let text = graph.formula(at).unwrap_or_default();
            let expr = rewrite_formula(
                text,
                graph.references(at),
                |r| graph.contains(r),
                dialect,
                &options.namespaces,
            );
            (*at, expr)
        })
        .collect();

    let mut inputs: BTreeMap<String, CellValue> = BTreeMap::new();
    for node in graph.nodes() {
        for key in graph.external_inputs(&node) {
            let Ok(at) = CellRef::parse(key) else {
                continue;
            };
            if let Some(value) = classified.value(&at) {
                inputs.insert(key.to_string(), value.clone());
            }
        }
    }
    let inputs: Vec<(String, CellValue)> = inputs.into_iter().collect();

    let name = sanitize_identifier_or(title, dialect, &options.default_function_name);
    let source = emit_unit(&name, &assignments, dialect, &options.namespaces);
    let example_input = emit_example_input(&inputs, dialect);

    tracing::debug!(
        function = %name,
        formulas = order.len(),
        inputs = inputs.len(),
        "compiled sheet"
    );

    Ok(CompiledUnit {
        name,
        source,
        example_input,
        order,
        inputs,
        dialect,
    })
}
