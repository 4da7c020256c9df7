//! Reference extraction from formula text.
//!
//! A reference is a maximal run of upper-case letters followed by digits
//! (`A1`, `AB12`), optionally anchored with `$` (`$A$1`). The scan is purely
//! lexical; nothing here checks that a reference points at a real cell.
//!
//! Skipped:
//! - tokens inside double-quoted string literals
//! - tokens that are part of a longer identifier or number (`xA1`, `1E5`)
//! - tokens directly followed by `(`, which are function names (`LOG10(`)

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

/// One coordinate token found in formula text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Byte span of the token (including any `$`) in the formula text.
    pub span: Range<usize>,
    /// The token exactly as written.
    pub token: String,
    /// Canonical coordinate string, or the `$`-stripped token when it does
    /// not parse as a coordinate (`A0`).
    pub key: String,
    pub at: Option<CellRef>,
}

impl Reference {
    fn new(span: Range<usize>, token: &str) -> Reference {
        let bare: String = token.chars().filter(|&c| c != '$').collect();
        let at = CellRef::parse(&bare).ok();
        let key = at.map(|c| c.to_string()).unwrap_or(bare);
        Reference {
            span,
            token: token.to_string(),
            key,
            at,
        }
    }
}

/// Extract all references from `text`, left to right, duplicates retained.
pub fn extract_references(text: &str) -> Vec<Reference> {
    let masked = mask_string_literals(text);
    let bytes = masked.as_bytes();

    reference_re()
        .find_iter(&masked)
        .filter(|m| {
            let before_ok = m.start() == 0 || !is_leading_boundary_byte(bytes[m.start() - 1]);
            let after_ok = m.end() == bytes.len() || !is_trailing_boundary_byte(bytes[m.end()]);
            before_ok && after_ok
        })
        .map(|m| Reference::new(m.range(), &text[m.range()]))
        .collect()
}

fn reference_re() -> &'static Regex {
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    REFERENCE_RE.get_or_init(|| {
        Regex::new(r"\$?[A-Z]+\$?[0-9]+").expect("reference regex must compile")
    })
}

fn is_leading_boundary_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.')
}

fn is_trailing_boundary_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'(')
}

/// Blank out the contents of string literals, keeping byte offsets intact.
/// Quotes themselves are kept; `\"` does not close a literal.
fn mask_string_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
                out.push('"');
                continue;
            }
            out.extend(std::iter::repeat_n(' ', ch.len_utf8()));
        } else {
            if ch == '"' {
                in_string = true;
            }
            out.push(ch);
        }
    }

    out
}
