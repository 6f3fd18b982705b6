//! Delimiter tokenizer.
//!
//! Splits a record into elements and an element into components. Blank
//! input yields no tokens at all rather than one empty token, so callers
//! can tell "no data" apart from "one empty field".

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::delimiters::Delimiters;

/// Split `text` on `separator`.
///
/// Empty or all-whitespace input yields an empty sequence.
pub fn split(text: &str, separator: char) -> Vec<&str> {
    split_released(text, separator, None)
}

/// Split `text` on `separator`, skipping separators escaped by `release`.
///
/// Release characters are left in place; see [`unescape`].
pub fn split_released(text: &str, separator: char, release: Option<char>) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let Some(release) = release else {
        return text.split(separator).collect();
    };

    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == release {
            escaped = true;
        } else if c == separator {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Drop release characters, keeping the character each one escapes.
pub fn unescape(text: &str, release: Option<char>) -> String {
    let Some(release) = release else {
        return text.to_string();
    };
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == release {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Strip surrounding line breaks and one trailing, unreleased terminator.
pub fn strip_terminator<'a>(record: &'a str, delimiters: &Delimiters) -> &'a str {
    let record = record.trim_matches(|c| c == '\r' || c == '\n');
    let Some(body) = record.strip_suffix(delimiters.terminator) else {
        return record;
    };
    let released = match delimiters.release {
        Some(release) => body.chars().rev().take_while(|&c| c == release).count() % 2 == 1,
        None => false,
    };
    if released {
        record
    } else {
        body
    }
}

/// Positional view over the elements of one record.
///
/// Element 0 is the tag. Accessors return unescaped text and treat empty
/// elements or components as absent.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    parts: Vec<&'a str>,
    delimiters: Delimiters,
}

impl<'a> Elements<'a> {
    /// Tokenize a record that has already lost its terminator.
    pub fn new(record: &'a str, delimiters: Delimiters) -> Self {
        Self {
            parts: split_released(record, delimiters.element, delimiters.release),
            delimiters,
        }
    }

    /// Number of elements, tag included.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if the record held no elements at all.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The unescaped text of element `i`, if present and non-empty.
    pub fn text(&self, i: usize) -> Option<String> {
        self.parts
            .get(i)
            .filter(|s| !s.is_empty())
            .map(|s| unescape(s, self.delimiters.release))
    }

    /// The unescaped components of element `i`.
    ///
    /// Positions are preserved: empty components stay as empty strings.
    /// A missing or blank element yields no components.
    pub fn components(&self, i: usize) -> Vec<String> {
        let Some(element) = self.parts.get(i) else {
            return Vec::new();
        };
        split_released(element, self.delimiters.component, self.delimiters.release)
            .into_iter()
            .map(|c| unescape(c, self.delimiters.release))
            .collect()
    }

    /// Component `j` of element `i`, if present and non-empty.
    pub fn component(&self, i: usize, j: usize) -> Option<String> {
        component(&self.components(i), j)
    }

    /// Best-effort decimal using this interchange's decimal mark.
    pub fn decimal(&self, text: &str) -> Decimal {
        lenient_decimal(text, self.delimiters.decimal_mark)
    }
}

/// Pick component `j`, treating an empty string as absent.
pub fn component(components: &[String], j: usize) -> Option<String> {
    components.get(j).filter(|s| !s.is_empty()).cloned()
}

/// Best-effort number; anything unparsable becomes the default value.
pub fn lenient_number<T: FromStr + Default>(text: &str) -> T {
    text.trim().parse().unwrap_or_default()
}

/// Best-effort decimal; anything unparsable becomes zero.
pub fn lenient_decimal(text: &str, decimal_mark: char) -> Decimal {
    let text = text.trim();
    if decimal_mark == '.' {
        return Decimal::from_str(text).unwrap_or_default();
    }
    Decimal::from_str(&text.replace(decimal_mark, ".")).unwrap_or_default()
}

/// Parse a date against a chrono pattern, leaving it unset on failure.
pub fn lenient_date(text: &str, pattern: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), pattern).ok()
}

/// Parse a date and time against a chrono pattern, leaving it unset on failure.
pub fn lenient_datetime(text: &str, pattern: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), pattern).ok()
}
