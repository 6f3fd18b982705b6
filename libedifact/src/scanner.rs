//! Phase 1: Scanner
//!
//! The scanner converts raw interchange text into records. It:
//! - drops a leading UTF-8 BOM
//! - reads a leading UNA to learn the terminator and release character
//! - splits one record per line when the text spans several lines that
//!   do not all end in the terminator, and on unreleased terminators
//!   otherwise
//! - trims line breaks left around each record

use crate::delimiters::Delimiters;
use crate::error::{ParseContext, Result};
use crate::tokenizer::{split_released, strip_terminator};

/// Number of characters in a complete UNA record, terminator included.
const UNA_LEN: usize = 9;

/// Scan source text into raw records.
///
/// A UNA record is kept whole (terminator included) so the parser can read
/// the service characters again from it.
pub fn scan(source: &str, ctx: &ParseContext) -> Result<Vec<String>> {
    let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);

    let mut records = Vec::new();
    let mut delimiters = ctx.delimiters;
    let mut rest = source;

    if source.starts_with("UNA") {
        let end = source
            .char_indices()
            .nth(UNA_LEN)
            .map_or(source.len(), |(i, _)| i);
        let una = &source[..end];
        delimiters = Delimiters::from_una(una).map_err(|e| e.with_location(ctx, 0, "UNA"))?;
        records.push(una.to_string());
        rest = &source[end..];
    }

    if is_line_per_record(rest, &delimiters) {
        records.extend(rest.lines().map(clean));
    } else {
        let pieces = split_released(rest, delimiters.terminator, delimiters.release);
        records.extend(pieces.into_iter().map(clean));
    }
    Ok(records)
}

/// Several non-blank lines, at least one of them without a terminator.
fn is_line_per_record(text: &str, delimiters: &Delimiters) -> bool {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    let unterminated = |line: &&str| strip_terminator(line, delimiters).len() == line.len();
    lines.len() > 1 && lines.iter().any(unterminated)
}

/// Drop leading whitespace and trailing line breaks from one record.
fn clean(piece: &str) -> String {
    piece
        .trim_start()
        .trim_end_matches(|c| c == '\r' || c == '\n')
        .to_string()
}
