//! Cell coordinate parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style coordinates
//! (e.g., "A1", "B2", "AA100") and 1-based column/row numbers, plus the
//! bounding-box range used to filter cells.
//!
//! Parsing accepts lower-case column letters; formatting always produces
//! upper-case, and leading zeros in the row are dropped (`a01` -> `A1`).
//!
//! # Examples
//!
//! ```
//! use sheetfn_engine::engine::CellRef;
//!
//! let cell = CellRef::parse("B3").unwrap();
//! assert_eq!(cell.col, 2);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{EngineError, Result};

/// A cell coordinate by 1-based column and row.
///
/// Field order makes the derived ordering compare by column first, then row.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub col: u32,
    pub row: u32,
}

impl CellRef {
    /// Largest coordinate of an `.xlsx` worksheet (`XFD1048576`).
    pub const SHEET_MAX: CellRef = CellRef {
        col: 16_384,
        row: 1_048_576,
    };

    pub const SHEET_MIN: CellRef = CellRef { col: 1, row: 1 };

    pub fn new(col: u32, row: u32) -> CellRef {
        CellRef { col, row }
    }

    /// Parse a coordinate from spreadsheet notation (e.g., "A1", "b2", "AA10").
    pub fn parse(token: &str) -> Result<CellRef> {
        Self::parse_a1(token).ok_or_else(|| EngineError::MalformedCoordinate(token.to_string()))
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let col = letters_to_col(letters)?;
        let row = numbers.parse::<u32>().ok().filter(|&r| r > 0)?;

        Some(CellRef::new(col, row))
    }

    /// Bounding-box test: column and row must each lie within `[lo, hi]`.
    pub fn within(&self, lo: &CellRef, hi: &CellRef) -> bool {
        (lo.col..=hi.col).contains(&self.col) && (lo.row..=hi.row).contains(&self.row)
    }

    /// Convert a 1-based column to spreadsheet-style letters (1 -> A, 26 -> Z, 27 -> AA).
    pub fn col_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

/// Decode column letters as a bijective base-26 numeral (A=1 ... Z=26, AA=27).
fn letters_to_col(letters: &str) -> Option<u32> {
    let mut acc = 0u32;
    for c in letters.to_ascii_uppercase().bytes() {
        let digit = (c - b'A') as u32 + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc)
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$")
            .expect("coordinate regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        CellRef::parse(s)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row)
    }
}

/// Inclusive rectangular filter over coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub min: CellRef,
    pub max: CellRef,
}

impl CellRange {
    /// Build a range from optional bounds; a missing bound is the sheet edge.
    pub fn new(min: Option<CellRef>, max: Option<CellRef>) -> CellRange {
        CellRange {
            min: min.unwrap_or(CellRef::SHEET_MIN),
            max: max.unwrap_or(CellRef::SHEET_MAX),
        }
    }

    /// Parse optional bound tokens. Returns `None` when neither bound is given.
    pub fn from_bounds(min: Option<&str>, max: Option<&str>) -> Result<Option<CellRange>> {
        if min.is_none() && max.is_none() {
            return Ok(None);
        }
        let min = min.map(CellRef::parse).transpose()?;
        let max = max.map(CellRef::parse).transpose()?;
        Ok(Some(CellRange::new(min, max)))
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        cell.within(&self.min, &self.max)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_basic() {
        assert_eq!(CellRef::parse("A1").unwrap(), CellRef::new(1, 1));
        assert_eq!(CellRef::parse("Z9").unwrap(), CellRef::new(26, 9));
        assert_eq!(CellRef::parse("AA10").unwrap(), CellRef::new(27, 10));
        assert_eq!(CellRef::parse("XFD1048576").unwrap(), CellRef::SHEET_MAX);
    }

    #[test]
    fn test_parse_normalizes_case_and_leading_zeros() {
        let cell = CellRef::parse("ab07").unwrap();
        assert_eq!(cell.to_string(), "AB7");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "A", "1", "1A", "A1B", "A-1", "$A$1", "A0", " A1"] {
            assert!(
                matches!(CellRef::parse(bad), Err(EngineError::MalformedCoordinate(_))),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_parse_a1_overflow_is_malformed() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::parse(&huge).is_err());
        assert!(CellRef::parse("A99999999999").is_err());
    }

    #[test]
    fn test_col_to_letters() {
        assert_eq!(CellRef::col_to_letters(1), "A");
        assert_eq!(CellRef::col_to_letters(26), "Z");
        assert_eq!(CellRef::col_to_letters(27), "AA");
        assert_eq!(CellRef::col_to_letters(702), "ZZ");
        assert_eq!(CellRef::col_to_letters(703), "AAA");
    }

    #[test]
    fn test_col_to_letters_handles_max_u32() {
        let letters = CellRef::col_to_letters(u32::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
        assert_eq!(CellRef::parse(&format!("{letters}1")).unwrap().col, u32::MAX);
    }

    #[test]
    fn test_ordering_is_column_then_row() {
        let a2 = CellRef::parse("A2").unwrap();
        let b1 = CellRef::parse("B1").unwrap();
        assert!(a2 < b1);
    }

    #[test]
    fn test_within_is_a_bounding_box() {
        let lo = CellRef::parse("B2").unwrap();
        let hi = CellRef::parse("C5").unwrap();
        assert!(CellRef::parse("B2").unwrap().within(&lo, &hi));
        assert!(CellRef::parse("C5").unwrap().within(&lo, &hi));
        assert!(CellRef::parse("C3").unwrap().within(&lo, &hi));
        // Row-major it would fall between B2 and C5; as a box it does not.
        assert!(!CellRef::parse("D3").unwrap().within(&lo, &hi));
        assert!(!CellRef::parse("B6").unwrap().within(&lo, &hi));
        assert!(!CellRef::parse("A3").unwrap().within(&lo, &hi));
    }

    #[test]
    fn test_range_from_bounds_defaults() {
        assert_eq!(CellRange::from_bounds(None, None).unwrap(), None);
        let range = CellRange::from_bounds(None, Some("C3")).unwrap().unwrap();
        assert_eq!(range.min, CellRef::SHEET_MIN);
        assert_eq!(range.max, CellRef::new(3, 3));
        let range = CellRange::from_bounds(Some("B2"), None).unwrap().unwrap();
        assert_eq!(range.max, CellRef::SHEET_MAX);
        assert!(CellRange::from_bounds(Some("2B"), None).is_err());
    }

    proptest! {
        #[test]
        fn prop_coordinate_round_trip(col in 1u32..=100_000, row in 1u32..=2_000_000) {
            let cell = CellRef::new(col, row);
            let text = cell.to_string();
            prop_assert_eq!(CellRef::parse(&text).unwrap(), cell);
            prop_assert_eq!(CellRef::parse(&text.to_ascii_lowercase()).unwrap(), cell);
        }

        #[test]
        fn prop_canonical_strings_round_trip(s in "[A-Z]{1,3}[1-9][0-9]{0,5}") {
            prop_assert_eq!(CellRef::parse(&s).unwrap().to_string(), s);
        }
    }
}
