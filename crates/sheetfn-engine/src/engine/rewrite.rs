//! Reference rewriting.
//!
//! Every reference token in a formula is replaced with a map access: into
//! the computed namespace when the referenced cell is a formula, into the
//! input namespace otherwise. Nothing else in the text is touched, so
//! function names and operators reach the target language as written.

use super::CellRef;
use super::dialect::Dialect;
use super::refs::Reference;

/// Identifiers of the two maps inside the emitted function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespaces {
    pub input: String,
    pub computed: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Namespaces {
            input: "d".to_string(),
            computed: "computed".to_string(),
        }
    }
}

impl Namespaces {
    /// Check that both names are usable identifiers in `dialect` and that
    /// they differ. The error says which name is wrong.
    pub fn validate(&self, dialect: Dialect) -> Result<(), String> {
        for name in [&self.input, &self.computed] {
            if !dialect.is_valid_identifier(name) {
                return Err(format!("{:?} is not a valid {} identifier", name, dialect));
            }
        }
        if self.input == self.computed {
            return Err(format!(
                "input and computed names must differ (both are {:?})",
                self.input
            ));
        }
        Ok(())
    }
}

/// Rewrite `text` using the references already extracted from it.
/// `is_formula` decides which namespace a reference resolves into.
pub fn rewrite_formula<F>(
    text: &str,
    refs: &[Reference],
    is_formula: F,
    dialect: Dialect,
    names: &Namespaces,
) -> String
where
    F: Fn(&CellRef) -> bool,
{
    let mut out = String::with_capacity(text.len() + refs.len() * 8);
    let mut last = 0;

    for r in refs {
        out.push_str(&text[last..r.span.start]);
        let namespace = if r.at.as_ref().is_some_and(&is_formula) {
            &names.computed
        } else {
            &names.input
        };
        out.push_str(&dialect.map_access(namespace, &r.key));
        last = r.span.end;
    }
    out.push_str(&text[last..]);

    if out.trim().is_empty() {
        return dialect.null_literal().to_string();
    }
    out.trim().to_string()
}
