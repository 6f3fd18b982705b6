//! Service characters and the UNA service string advice.
//!
//! An interchange may open with `UNA` followed by six characters that
//! override the defaults below, in this order: component separator,
//! element separator, decimal mark, release character, reserved, segment
//! terminator. A space in the release position means "no release
//! character".

use crate::error::{ParseError, Result};

/// The delimiter set structuring records, elements and components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delimiters {
    /// Separates components inside an element (`:`).
    pub component: char,
    /// Separates elements inside a record (`+`).
    pub element: char,
    /// Decimal mark used by numeric values (`.`).
    pub decimal_mark: char,
    /// Escapes the next character when present.
    pub release: Option<char>,
    /// Ends a record (`'`).
    pub terminator: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            component: ':',
            element: '+',
            decimal_mark: '.',
            release: None,
            terminator: '\'',
        }
    }
}

impl Delimiters {
    /// Read the service characters from a `UNA` record.
    ///
    /// The record may or may not still carry its own terminator. Without
    /// it only five characters follow the tag and the default terminator
    /// is kept.
    pub fn from_una(record: &str) -> Result<Self> {
        let advice: Vec<char> = record.chars().skip(3).take(6).collect();
        if !record.starts_with("UNA") || advice.len() < 5 {
            return Err(ParseError::malformed(
                "UNA",
                "service string advice needs at least five characters",
            ));
        }

        let defaults = Self::default();
        let delimiters = Self {
            component: advice[0],
            element: advice[1],
            decimal_mark: advice[2],
            release: match advice[3] {
                ' ' => None,
                c => Some(c),
            },
            terminator: advice.get(5).copied().unwrap_or(defaults.terminator),
        };

        if delimiters.decimal_mark != '.' && delimiters.decimal_mark != ',' {
            return Err(ParseError::unrecognized(
                "UNA decimal mark",
                &delimiters.decimal_mark.to_string(),
            ));
        }

        let mut service = vec![
            delimiters.component,
            delimiters.element,
            delimiters.terminator,
        ];
        service.extend(delimiters.release);
        service.sort_unstable();
        service.dedup();
        if service.len() != 3 + usize::from(delimiters.release.is_some()) {
            return Err(ParseError::malformed(
                "UNA",
                "separators, release character and terminator must be distinct",
            ));
        }

        Ok(delimiters)
    }
}
