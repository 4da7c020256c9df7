//! Function emission.
//!
//! Assembles rewritten expressions into a named unit and renders the
//! example-input literal.

use super::CellRef;
use super::cell::CellValue;
use super::dialect::Dialect;
use super::rewrite::Namespaces;

/// Used when a sheet title has no identifier characters at all.
pub const DEFAULT_FUNCTION_NAME: &str = "excelFunction";

const INDENT: &str = "    ";

/// Turn an arbitrary title into a bare identifier for `dialect`.
pub fn sanitize_identifier(name: &str, dialect: Dialect) -> String {
    sanitize_identifier_or(name, dialect, DEFAULT_FUNCTION_NAME)
}

/// Like [`sanitize_identifier`], with a caller-chosen fallback name.
///
/// Characters outside the dialect's identifier set are dropped. A result
/// without any letter or digit falls back to `default`; a leading digit or a
/// reserved word gets a `_` prefix.
pub fn sanitize_identifier_or(name: &str, dialect: Dialect, default: &str) -> String {
    let keep = |s: &str| -> Option<String> {
        let ident: String = s.chars().filter(|&c| dialect.is_identifier_char(c)).collect();
        ident.chars().any(|c| c.is_ascii_alphanumeric()).then_some(ident)
    };

    let mut ident = keep(name)
        .or_else(|| keep(default))
        .unwrap_or_else(|| DEFAULT_FUNCTION_NAME.to_string());
    if ident.starts_with(|c: char| c.is_ascii_digit()) || dialect.is_reserved(&ident) {
        ident.insert(0, '_');
    }
    ident
}

/// Emit the unit: one assignment per formula, in evaluation order, then
/// return the computed namespace.
pub fn emit_unit(
    name: &str,
    assignments: &[(CellRef, String)],
    dialect: Dialect,
    names: &Namespaces,
) -> String {
    let mut lines = vec![
        dialect.function_header(name, &names.input),
        format!(
            "{INDENT}{}",
            dialect.line_comment(&format!("{} holds the input cell values", names.input))
        ),
        format!("{INDENT}{}", dialect.declare_map(&names.computed)),
    ];

    for (at, expr) in assignments {
        let target = dialect.map_access(&names.computed, &at.to_string());
        lines.push(format!("{INDENT}{}", dialect.assign(&target, expr)));
    }

    lines.push(format!("{INDENT}{}", dialect.return_value(&names.computed)));
    lines.push("}".to_string());
    lines.join("\n")
}

/// Render the example input as a map literal, one entry per line, in the
/// order given.
pub fn emit_example_input(entries: &[(String, CellValue)], dialect: Dialect) -> String {
    if entries.is_empty() {
        return format!("{}}}", dialect.map_open());
    }

    let body = entries
        .iter()
        .map(|(key, value)| {
            format!(
                "{INDENT}{}: {}",
                dialect.quote_string(key),
                dialect.render_value(value)
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!("{}\n{}\n}}", dialect.map_open(), body)
}
