//! Error types for EDIFACT parsing.

use std::fmt;

use thiserror::Error;

use crate::delimiters::Delimiters;

/// Result type for EDIFACT parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying the filename and starting delimiters.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
    pub delimiters: Delimiters,
}

impl ParseContext {
    /// Create a new parse context with the default service characters.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
            delimiters: Delimiters::default(),
        }
    }

    /// Replace the delimiters used until a UNA record says otherwise.
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, record: usize, tag: &str) -> String {
        let mut suffix = format!(" at record {}", record + 1);
        if !tag.is_empty() {
            suffix.push_str(&format!(" ({})", tag));
        }
        suffix.push_str(&self.file_suffix());
        suffix
    }

    /// Format the filename part of a location suffix on its own.
    pub fn file_suffix(&self) -> String {
        match &self.filename {
            Some(name) => format!(" of <{}>", name),
            None => String::new(),
        }
    }
}

/// Which trailer count failed to agree with what was read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountCheck {
    /// CNT line count against LIN segments in the message.
    LineItems,
    /// UNT segment count against segments since UNH.
    DocumentSegments,
    /// UNZ message count against UNH segments in the interchange.
    Documents,
}

impl fmt::Display for CountCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountCheck::LineItems => write!(f, "line item count (CNT)"),
            CountCheck::DocumentSegments => write!(f, "message segment count (UNT)"),
            CountCheck::Documents => write!(f, "message count (UNZ)"),
        }
    }
}

/// Error type for EDIFACT parsing.
///
/// Every variant is fatal to the interchange being parsed. The trailing
/// `String` of each variant is the location suffix, empty until
/// [`ParseError::with_location`] fills it in.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A segment arrived while the nesting state did not allow it.
    #[error("{0}{1}")]
    OrderingViolation(String, String),

    /// A trailer count disagrees with the observed count (stated, read).
    #[error("Mismatched {0}: trailer states {1}, read {2}{3}")]
    CountMismatch(CountCheck, usize, usize, String),

    /// A mandatory element or component is missing or over-long.
    #[error("Malformed {0} segment: {1}{2}")]
    MalformedElement(&'static str, String, String),

    /// A record whose tag is not in the segment catalogue.
    #[error("Unknown segment <{0}>{1}")]
    UnknownSegment(String, String),

    /// A coded qualifier outside its closed code list.
    #[error("Unrecognized {0} \"{1}\"{2}")]
    UnrecognizedCode(&'static str, String, String),

    /// The stream ended before the interchange trailer.
    #[error("Incomplete interchange: {0}{1}")]
    IncompleteInterchange(String, String),
}

impl ParseError {
    /// Create an error with location information.
    pub fn with_location(self, ctx: &ParseContext, record: usize, tag: &str) -> Self {
        let suffix = ctx.loc_suffix(record, tag);
        match self {
            ParseError::OrderingViolation(msg, _) => ParseError::OrderingViolation(msg, suffix),
            ParseError::CountMismatch(check, stated, read, _) => {
                ParseError::CountMismatch(check, stated, read, suffix)
            }
            ParseError::MalformedElement(tag, detail, _) => {
                ParseError::MalformedElement(tag, detail, suffix)
            }
            ParseError::UnknownSegment(record, _) => ParseError::UnknownSegment(record, suffix),
            ParseError::UnrecognizedCode(what, code, _) => {
                ParseError::UnrecognizedCode(what, code, suffix)
            }
            ParseError::IncompleteInterchange(reason, _) => {
                ParseError::IncompleteInterchange(reason, suffix)
            }
        }
    }

    pub(crate) fn ordering(message: impl Into<String>) -> Self {
        ParseError::OrderingViolation(message.into(), String::new())
    }

    pub(crate) fn count_mismatch(check: CountCheck, stated: usize, read: usize) -> Self {
        ParseError::CountMismatch(check, stated, read, String::new())
    }

    pub(crate) fn malformed(tag: &'static str, detail: impl Into<String>) -> Self {
        ParseError::MalformedElement(tag, detail.into(), String::new())
    }

    pub(crate) fn unrecognized(what: &'static str, code: &str) -> Self {
        ParseError::UnrecognizedCode(what, code.to_string(), String::new())
    }
}
