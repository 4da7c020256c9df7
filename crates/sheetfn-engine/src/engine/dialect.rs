//! Target expression languages for emitted units.
//!
//! Each dialect knows how to spell the pieces the emitter needs: map
//! access, literals, the function wrapper and the example-invocation harness.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell::CellValue;

/// Language the compiled unit is written in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    #[serde(alias = "javascript")]
    Js,
    Rhai,
}

const JS_RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

const RHAI_RESERVED: &[&str] = &[
    "as", "break", "call", "catch", "const", "continue", "curry", "do", "else", "export",
    "false", "fn", "for", "global", "if", "import", "in", "is_def_fn", "is_def_var",
    "is_shared", "let", "loop", "print", "debug", "private", "return", "switch", "this",
    "throw", "true", "try", "type_of", "until", "while", "Fn", "_",
    // reserved for future use
    "var", "static", "shared", "goto", "exit", "match", "case", "public", "protected", "new",
    "use", "with", "module", "package", "super", "spawn", "thread", "go", "sync", "async",
    "await", "yield", "default", "void", "null", "nil",
];

impl Dialect {
    /// Characters besides ASCII alphanumerics and `_` allowed in identifiers.
    pub fn is_identifier_char(self, c: char) -> bool {
        c.is_ascii_alphanumeric()
            || c == '_'
            || match self {
                Dialect::Js => c == '$',
                Dialect::Rhai => false,
            }
    }

    /// Whether `name` can be used as a variable or parameter as written.
    pub fn is_valid_identifier(self, name: &str) -> bool {
        name.chars().all(|c| self.is_identifier_char(c))
            && name.chars().any(|c| c.is_ascii_alphanumeric())
            && !name.starts_with(|c: char| c.is_ascii_digit())
            && !self.is_reserved(name)
    }

    pub fn is_reserved(self, word: &str) -> bool {
        match self {
            Dialect::Js => JS_RESERVED.contains(&word),
            Dialect::Rhai => RHAI_RESERVED.contains(&word),
        }
    }

    pub fn null_literal(self) -> &'static str {
        match self {
            Dialect::Js => "null",
            Dialect::Rhai => "()",
        }
    }

    /// `ns["key"]`
    pub fn map_access(self, namespace: &str, key: &str) -> String {
        format!("{}[{}]", namespace, self.quote_string(key))
    }

    pub fn quote_string(self, s: &str) -> String {
        match self {
            // A JSON string is a valid JavaScript string literal.
            Dialect::Js => serde_json::Value::String(s.to_string()).to_string(),
            Dialect::Rhai => quote_rhai(s),
        }
    }

    pub fn render_number(self, n: f64) -> String {
        if n.is_nan() {
            return match self {
                Dialect::Js => "NaN".to_string(),
                Dialect::Rhai => "(0.0 / 0.0)".to_string(),
            };
        }
        if n.is_infinite() {
            let sign = if n < 0.0 { "-" } else { "" };
            return match self {
                Dialect::Js => format!("{sign}Infinity"),
                Dialect::Rhai => format!("({sign}1.0 / 0.0)"),
            };
        }
        if n.fract() == 0.0 && n.abs() < 1e15 {
            return format!("{}", n as i64);
        }
        // Rust's shortest round-trip float formatting; always carries a '.'
        // or an exponent for non-integral values.
        format!("{n:?}")
    }

    pub fn render_value(self, value: &CellValue) -> String {
        match value {
            CellValue::Empty => self.null_literal().to_string(),
            CellValue::Text(s) => self.quote_string(s),
            CellValue::Number(n) => self.render_number(*n),
            CellValue::Bool(b) => b.to_string(),
        }
    }

    /// Open an object/map literal.
    pub fn map_open(self) -> &'static str {
        match self {
            Dialect::Js => "{",
            Dialect::Rhai => "#{",
        }
    }

    pub fn line_comment(self, text: &str) -> String {
        format!("// {text}")
    }

    /// Function header line.
    pub fn function_header(self, name: &str, input: &str) -> String {
        match self {
            Dialect::Js => format!("function {name}({input}) {{"),
            Dialect::Rhai => format!("fn {name}({input}) {{"),
        }
    }

    pub fn declare_map(self, name: &str) -> String {
        format!("let {name} = {}}};", self.map_open())
    }

    pub fn assign(self, target: &str, expr: &str) -> String {
        format!("{target} = {expr};")
    }

    pub fn return_value(self, name: &str) -> String {
        match self {
            Dialect::Js => format!("return {name};"),
            Dialect::Rhai => name.to_string(),
        }
    }

    /// Example invocation: bind the literal, call the unit, print the result.
    pub fn harness(self, function: &str, literal: &str) -> String {
        let args = format!("{function}_args");
        match self {
            Dialect::Js => format!(
                "const {args} = {literal};\n\nconsole.log(\"Output for {function}: \", {function}({args}));"
            ),
            Dialect::Rhai => format!(
                "let {args} = {literal};\n\nprint(`Output for {function}: ${{{function}({args})}}`);"
            ),
        }
    }
}

fn quote_rhai(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Js => write!(f, "JavaScript"),
            Dialect::Rhai => write!(f, "Rhai"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "js" | "javascript" => Ok(Dialect::Js),
            "rhai" => Ok(Dialect::Rhai),
            _ => Err(format!("Unknown dialect: {} (expected js or rhai)", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_number() {
        let d = Dialect::Js;
        assert_eq!(d.render_number(2.0), "2");
        assert_eq!(d.render_number(-3.0), "-3");
        assert_eq!(d.render_number(0.5), "0.5");
        assert_eq!(d.render_number(1e20), "1e20");
        assert_eq!(d.render_number(f64::NAN), "NaN");
        assert_eq!(d.render_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(Dialect::Rhai.render_number(f64::INFINITY), "(1.0 / 0.0)");
    }

    #[test]
    fn test_render_values() {
        assert_eq!(Dialect::Js.render_value(&CellValue::Empty), "null");
        assert_eq!(Dialect::Rhai.render_value(&CellValue::Empty), "()");
        assert_eq!(Dialect::Js.render_value(&CellValue::Bool(true)), "true");
        assert_eq!(
            Dialect::Js.render_value(&CellValue::text("say \"hi\"\n")),
            r#""say \"hi\"\n""#
        );
        assert_eq!(
            Dialect::Rhai.render_value(&CellValue::text("a\\b\"c")),
            r#""a\\b\"c""#
        );
    }

    #[test]
    fn test_map_access() {
        assert_eq!(Dialect::Js.map_access("d", "A1"), r#"d["A1"]"#);
        assert_eq!(Dialect::Rhai.map_access("computed", "B2"), r#"computed["B2"]"#);
    }

    #[test]
    fn test_identifier_chars() {
        assert!(Dialect::Js.is_identifier_char('$'));
        assert!(!Dialect::Rhai.is_identifier_char('$'));
        assert!(!Dialect::Js.is_identifier_char('é'));
    }

    #[test]
    fn test_valid_identifiers() {
        assert!(Dialect::Js.is_valid_identifier("d"));
        assert!(Dialect::Js.is_valid_identifier("$in_1"));
        assert!(Dialect::Rhai.is_valid_identifier("computed"));
        assert!(!Dialect::Rhai.is_valid_identifier("$in"));
        assert!(!Dialect::Js.is_valid_identifier(""));
        assert!(!Dialect::Js.is_valid_identifier("my input"));
        assert!(!Dialect::Js.is_valid_identifier("1st"));
        assert!(!Dialect::Js.is_valid_identifier("let"));
        assert!(!Dialect::Rhai.is_valid_identifier("fn"));
        assert!(!Dialect::Rhai.is_valid_identifier("__"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("JS".parse::<Dialect>().unwrap(), Dialect::Js);
        assert_eq!("javascript".parse::<Dialect>().unwrap(), Dialect::Js);
        assert_eq!("rhai".parse::<Dialect>().unwrap(), Dialect::Rhai);
        assert!("lua".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_harness() {
        assert_eq!(
            Dialect::Js.harness("Sheet1", "{}"),
            "const Sheet1_args = {};\n\nconsole.log(\"Output for Sheet1: \", Sheet1(Sheet1_args));"
        );
        assert_eq!(
            Dialect::Rhai.harness("Sheet1", "#{}"),
            "let Sheet1_args = #{};\n\nprint(`Output for Sheet1: ${Sheet1(Sheet1_args)}`);"
        );
    }
}
