//! EDIFACT interchange parser and structural validator.
//!
//! Reads a stream of segments (an interchange envelope holding one or more
//! ORDERS-style messages) into a typed tree, and checks every trailer count
//! and ordering rule on the way. The first violation aborts the parse.
//!
//! # Parsing Pipeline
//!
//! The parser operates in two phases:
//!
//! 1. **Scanner**: Splits source text into records on the segment
//!    terminator (or on line breaks), honouring a leading UNA and its
//!    release character.
//!
//! 2. **Assembler**: Classifies, tokenizes and decodes each record, checks
//!    it against the nesting state, and attaches it to the interchange,
//!    document or line item in scope.

mod codes;
mod delimiters;
mod error;
mod interchange;
mod parser;
mod scanner;
mod segment;
pub mod segments;
mod state;
mod tokenizer;

pub use codes::{
    CommunicationChannel, ContactFunction, ControlQualifier, DateFormat, DateQualifier,
    MeasuredDimension, MeasurementPurpose, MessageType, MonetaryQualifier, PartyQualifier,
    PriceQualifier, QuantityQualifier, ReferenceQualifier, SectionId,
};
pub use delimiters::Delimiters;
pub use error::{CountCheck, ParseContext, ParseError, Result};
pub use interchange::{Document, Interchange, LineItem};
pub use segment::{SegmentKind, SegmentTag};
pub use tokenizer::{split, Elements};

/// Parse an interchange from a string.
///
/// # Example
///
/// ```
/// use libedifact::parse;
///
/// let interchange = parse(
///     "UNB+UNOA:3+SENDER:14+RECIPIENT:14+240115:1030+1'\
///      UNH+1+ORDERS:D:96A:UN'BGM+220+PO1+9'UNT+3+1'UNZ+1+1'",
/// )
/// .unwrap();
/// assert_eq!(interchange.documents.len(), 1);
/// ```
pub fn parse(input: &str) -> Result<Interchange> {
    parse_with_filename(input, None)
}

/// Parse an interchange from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Interchange> {
    let ctx = ParseContext::new(filename);

    // Phase 1: Scan source into records
    let records = scanner::scan(input, &ctx)?;

    // Phase 2: Assemble records into the interchange tree
    parser::parse_records(&records, &ctx)
}

/// Parse an interchange from records that are already split.
pub fn parse_interchange<I, S>(records: I) -> Result<Interchange>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_interchange_with(records, &ParseContext::new(None))
}

/// Parse pre-split records with an explicit filename and starting delimiters.
pub fn parse_interchange_with<I, S>(records: I, ctx: &ParseContext) -> Result<Interchange>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parser::parse_records(records, ctx)
}
