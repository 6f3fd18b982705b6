//! Phase 2: Assembler
//!
//! The assembler consumes records one at a time. For each record it:
//! - classifies the tag and tokenizes the elements
//! - checks the nesting state and decodes the segment
//! - attaches the value to the interchange, document or line item in scope
//! - counts the record at every open level
//!
//! The first failure aborts the parse; there is no recovery path.

use tracing::{debug, trace, warn};

use crate::codes::MessageType;
use crate::delimiters::Delimiters;
use crate::error::{ParseContext, ParseError, Result};
use crate::interchange::{Document, Interchange, LineItem};
use crate::segment::{SegmentKind, SegmentTag};
use crate::segments::{
    decode_bgm, decode_cnt, decode_com, decode_cta, decode_cux, decode_dtm, decode_ftx, decode_imd,
    decode_lin, decode_mea, decode_moa, decode_nad, decode_pia, decode_pri, decode_qty, decode_rff,
    decode_unb, decode_unh, decode_uns, decode_unt, decode_unz, Segment,
};
use crate::state::ParseState;
use crate::tokenizer::{strip_terminator, Elements};

/// Parse pre-split records into one interchange.
///
/// Each record may still carry its terminator and line breaks. Blank
/// records are only allowed once the content has ended.
pub fn parse_records<I, S>(records: I, ctx: &ParseContext) -> Result<Interchange>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut assembler = Assembler::new(ctx.delimiters);
    let mut first_blank: Option<usize> = None;

    for (index, record) in records.into_iter().enumerate() {
        let record = record.as_ref().trim_start_matches(['\r', '\n']);
        if strip_terminator(record, &assembler.delimiters).trim().is_empty() {
            first_blank.get_or_insert(index);
            continue;
        }
        if let Some(blank) = first_blank {
            return Err(ParseError::UnknownSegment(String::new(), String::new())
                .with_location(ctx, blank, ""));
        }
        assembler
            .push(record)
            .map_err(|e| e.with_location(ctx, index, location_tag(record)))?;
    }

    assembler.finish(ctx)
}

fn location_tag(record: &str) -> &'static str {
    match SegmentTag::classify(record) {
        SegmentTag::Known(kind) => kind.as_str(),
        SegmentTag::Invalid => "",
    }
}

/// Owned builder threaded through every record of one parse.
struct Assembler {
    delimiters: Delimiters,
    service_advice: Option<Delimiters>,
    state: ParseState,
    seen_segment: bool,
    interchange: Option<Interchange>,
    document: Option<Document>,
    line: Option<LineItem>,
    finished: Option<Interchange>,
}

impl Assembler {
    fn new(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            service_advice: None,
            state: ParseState::new(),
            seen_segment: false,
            interchange: None,
            document: None,
            line: None,
            finished: None,
        }
    }

    fn push(&mut self, record: &str) -> Result<()> {
        let kind = match SegmentTag::classify(record) {
            SegmentTag::Known(kind) => kind,
            SegmentTag::Invalid => {
                let text = strip_terminator(record, &self.delimiters);
                return Err(ParseError::UnknownSegment(text.to_string(), String::new()));
            }
        };
        trace!(%kind, record, "segment");

        if self.state.is_envelope_closed() {
            return Err(ParseError::ordering(
                "Segment after the interchange trailer (UNZ)",
            ));
        }

        if kind == SegmentKind::Una {
            return self.service_string_advice(record);
        }
        self.seen_segment = true;

        let el = Elements::new(strip_terminator(record, &self.delimiters), self.delimiters);
        self.dispatch(kind, &el)?;
        self.state.record_segment();
        Ok(())
    }

    fn service_string_advice(&mut self, record: &str) -> Result<()> {
        if self.seen_segment {
            return Err(ParseError::ordering(
                "Service string advice (UNA) found after the first segment",
            ));
        }
        if self.service_advice.is_some() {
            return Err(ParseError::ordering(
                "Service string advice (UNA) found more than once",
            ));
        }
        let delimiters = Delimiters::from_una(record)?;
        debug!(?delimiters, "service string advice");
        self.delimiters = delimiters;
        self.service_advice = Some(delimiters);
        Ok(())
    }

    fn dispatch(&mut self, kind: SegmentKind, el: &Elements) -> Result<()> {
        match kind {
            SegmentKind::Una => Err(ParseError::ordering(
                "Service string advice (UNA) found after the first segment",
            )),
            SegmentKind::Unb => self.open_interchange(el),
            SegmentKind::Unh => self.open_document(el),
            SegmentKind::Bgm => {
                self.state.require_message_header(kind)?;
                let beginning = decode_bgm(el)?;
                self.document_mut(kind)?.beginning = Some(beginning);
                Ok(())
            }
            SegmentKind::Dtm => merge(&mut self.document_mut(kind)?.date_times, el, decode_dtm),
            SegmentKind::Ftx => {
                let text = decode_ftx(el)?;
                self.document_mut(kind)?.free_text.push(text);
                Ok(())
            }
            SegmentKind::Rff => merge(&mut self.document_mut(kind)?.references, el, decode_rff),
            SegmentKind::Nad => merge(&mut self.document_mut(kind)?.parties, el, decode_nad),
            SegmentKind::Cta => merge(&mut self.document_mut(kind)?.contact, el, decode_cta),
            SegmentKind::Com => merge(&mut self.document_mut(kind)?.communication, el, decode_com),
            SegmentKind::Cux => merge(&mut self.document_mut(kind)?.currencies, el, decode_cux),
            SegmentKind::Lin => self.open_line_item(el),
            SegmentKind::Pia => {
                let product = decode_pia(el)?;
                self.line_mut(kind)?.product = Some(product);
                Ok(())
            }
            SegmentKind::Imd => {
                let description = decode_imd(el)?;
                self.line_mut(kind)?.description = Some(description);
                Ok(())
            }
            SegmentKind::Qty => merge(&mut self.line_mut(kind)?.quantities, el, decode_qty),
            SegmentKind::Moa => {
                self.state.require_document(kind)?;
                if let Some(line) = self.line.as_mut() {
                    return merge(&mut line.monetary_amounts, el, decode_moa);
                }
                merge(
                    &mut self.document_mut(kind)?.monetary_amounts,
                    el,
                    decode_moa,
                )
            }
            SegmentKind::Mea => merge(&mut self.line_mut(kind)?.measurements, el, decode_mea),
            SegmentKind::Pri => merge(&mut self.line_mut(kind)?.prices, el, decode_pri),
            SegmentKind::Uns => {
                self.state.require_document(kind)?;
                let section = decode_uns(el)?;
                self.flush_line();
                self.document_mut(kind)?.section_control = Some(section);
                Ok(())
            }
            SegmentKind::Cnt => self.close_line_items(el),
            SegmentKind::Unt => self.close_document(el),
            SegmentKind::Unz => self.close_interchange(el),
        }
    }

    fn open_interchange(&mut self, el: &Elements) -> Result<()> {
        let header = decode_unb(el)?;
        if self.state.open_envelope()? {
            warn!(
                discarded = ?self.interchange.as_ref().map(|i| &i.header.control_reference),
                "Interchange header (UNB) restarts an open interchange"
            );
        }
        debug!(reference = ?header.control_reference, "opened interchange");
        self.interchange = Some(Interchange::new(self.service_advice, header));
        self.document = None;
        self.line = None;
        Ok(())
    }

    fn open_document(&mut self, el: &Elements) -> Result<()> {
        let header = decode_unh(el)?;
        self.state.open_document()?;
        if let Some(MessageType::Other(code)) = &header.message_type {
            warn!(message_type = %code, "unknown message type");
        }
        debug!(reference = ?header.message_reference, "opened message");
        self.document = Some(Document::new(header));
        Ok(())
    }

    fn open_line_item(&mut self, el: &Elements) -> Result<()> {
        let line = decode_lin(el)?;
        self.state.open_line_item()?;
        self.flush_line();
        debug!(line_number = line.line_number, "opened line item");
        self.line = Some(LineItem::new(line));
        Ok(())
    }

    fn close_line_items(&mut self, el: &Elements) -> Result<()> {
        self.state.close_line_items()?;
        self.flush_line();
        let total = decode_cnt(el)?;
        self.state.verify_line_count(total.count)?;
        self.document_mut(SegmentKind::Cnt)?.control_total = Some(total);
        Ok(())
    }

    fn close_document(&mut self, el: &Elements) -> Result<()> {
        let trailer = decode_unt(el)?;
        self.state.close_document(trailer.segment_count)?;
        self.flush_line();

        let mut document = self.document.take().ok_or_else(|| {
            ParseError::ordering("Message trailer (UNT) found before the start of a message (UNH)")
        })?;
        if trailer.message_reference != document.header.message_reference {
            warn!(
                header = ?document.header.message_reference,
                trailer = ?trailer.message_reference,
                "message trailer reference differs from its header"
            );
        }
        document.trailer = trailer;
        debug!(
            reference = ?document.header.message_reference,
            line_items = document.line_items.len(),
            "closed message"
        );

        let interchange = self.interchange.as_mut().ok_or_else(|| {
            ParseError::ordering("Message trailer (UNT) without an interchange header (UNB)")
        })?;
        interchange.documents.push(document);
        self.state.finish_document();
        Ok(())
    }

    fn close_interchange(&mut self, el: &Elements) -> Result<()> {
        let trailer = decode_unz(el)?;
        self.state.close_envelope(trailer.message_count)?;

        let mut interchange = self.interchange.take().ok_or_else(|| {
            ParseError::ordering("Interchange trailer (UNZ) without an interchange header (UNB)")
        })?;
        if trailer.control_reference != interchange.header.control_reference {
            warn!(
                header = ?interchange.header.control_reference,
                trailer = ?trailer.control_reference,
                "interchange trailer reference differs from its header"
            );
        }
        interchange.trailer = trailer;
        debug!(
            documents = self.state.documents_in_envelope(),
            segments = self.state.segments_in_envelope() + 1,
            "closed interchange"
        );
        self.finished = Some(interchange);
        Ok(())
    }

    /// Append the accumulating line item, if any, to its document.
    fn flush_line(&mut self) {
        if let (Some(line), Some(document)) = (self.line.take(), self.document.as_mut()) {
            debug!(line_number = line.line.line_number, "flushed line item");
            document.line_items.push(line);
        }
    }

    fn document_mut(&mut self, kind: SegmentKind) -> Result<&mut Document> {
        self.state.require_document(kind)?;
        self.document.as_mut().ok_or_else(|| {
            ParseError::ordering(format!(
                "{} found before the start of a message (UNH)",
                kind
            ))
        })
    }

    fn line_mut(&mut self, kind: SegmentKind) -> Result<&mut LineItem> {
        self.state.require_document(kind)?;
        self.line.as_mut().ok_or_else(|| {
            ParseError::ordering(format!("{} found outside a line item (LIN)", kind))
        })
    }

    fn finish(self, ctx: &ParseContext) -> Result<Interchange> {
        let seen_segment = self.seen_segment;
        self.finished.ok_or_else(|| {
            let reason = if seen_segment {
                "missing interchange trailer (UNZ)"
            } else {
                "no segments found"
            };
            ParseError::IncompleteInterchange(reason.to_string(), ctx.file_suffix())
        })
    }
}

/// Fold one record into the merge-accumulating value in `slot`.
fn merge<T>(
    slot: &mut Option<T>,
    el: &Elements,
    decode: fn(&Elements, T) -> Result<T>,
) -> Result<()>
where
    T: Segment + Default,
{
    let previous = slot.take();
    let kind = T::KIND;
    trace!(%kind, merging = previous.is_some(), "accumulate");
    *slot = Some(decode(el, previous.unwrap_or_default())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CountCheck;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn parse(records: &[&str]) -> Result<Interchange> {
        parse_records(records.iter(), &ParseContext::new(None))
    }

    const MINIMAL: &[&str] = &[
        "UNB+UNOA:3+SENDER:14+RECIPIENT:14+240115:1030+REF1'",
        "UNH+1+ORDERS:D:96A:UN:EAN008'",
        "BGM+220+PO123+9'",
        "LIN+1++5012345678900:EN'",
        "UNS+S'",
        "CNT+2:1'",
        "UNT+6+1'",
        "UNZ+1+REF1'",
    ];

    #[test]
    fn test_minimal_order() {
        let interchange = parse(MINIMAL).unwrap();
        assert_eq!(interchange.documents.len(), 1);
        let document = &interchange.documents[0];
        assert_eq!(document.line_items.len(), 1);
        assert_eq!(document.message_type(), Some(&MessageType::Orders));
        assert_eq!(
            document
                .beginning
                .as_ref()
                .and_then(|b| b.document_number.as_deref()),
            Some("PO123")
        );
        assert_eq!(document.trailer.segment_count, 6);
        assert_eq!(interchange.trailer.message_count, 1);
        assert_eq!(interchange.line_item_count(), 1);
    }

    #[test]
    fn test_message_without_interchange() {
        let err = parse(&["UNH+1+ORDERS:D:96A:UN'"]).unwrap_err();
        assert!(matches!(err, ParseError::OrderingViolation(_, _)));
        assert_eq!(
            err.to_string(),
            "Message header (UNH) without an interchange header (UNB) at record 1 (UNH)"
        );
    }

    #[test]
    fn test_control_total_mismatch() {
        let mut records = MINIMAL.to_vec();
        records[5] = "CNT+2:2'";
        let err = parse(&records).unwrap_err();
        assert!(matches!(
            err,
            ParseError::CountMismatch(CountCheck::LineItems, 2, 1, _)
        ));
    }

    #[test]
    fn test_message_segment_count_mismatch() {
        let mut records = MINIMAL.to_vec();
        records[6] = "UNT+5+1'";
        let err = parse(&records).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Mismatched message segment count (UNT): trailer states 5, read 6 at record 7 (UNT)"
        );
    }

    #[test]
    fn test_unknown_segment() {
        let err = parse(&["UNB+UNOA:3+S+R+240115:1030+1'", "XYZ+1'"]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown segment <XYZ+1> at record 2");
    }

    #[test]
    fn test_dates_merge_within_message() {
        let records = [
            "UNB+UNOA:3+S+R+240115:1030+1'",
            "UNH+1+ORDERS:D:96A:UN'",
            "DTM+137:20240115:102'",
            "DTM+64:20240201:102'",
            "UNT+4+1'",
            "UNZ+1+1'",
        ];
        let interchange = parse(&records).unwrap();
        let dates = interchange.documents[0].date_times.as_ref().unwrap();
        assert_eq!(dates.document, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(dates.delivery, NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_amounts_route_to_line_or_message() {
        let records = [
            "UNB+UNOA:3+S+R+240115:1030+1'",
            "UNH+1+ORDERS:D:96A:UN'",
            "LIN+1'",
            "QTY+21:48:PCE'",
            "QTY+59:6'",
            "MOA+203:735.50:EUR'",
            "UNS+S'",
            "MOA+86:735.50'",
            "CNT+2:1'",
            "UNT+9+1'",
            "UNZ+1+1'",
        ];
        let interchange = parse(&records).unwrap();
        let document = &interchange.documents[0];
        let line = &document.line_items[0];
        let quantities = line.quantities.as_ref().unwrap();
        assert_eq!(
            quantities.ordered.as_ref().unwrap().value,
            Decimal::new(48, 0)
        );
        assert!(quantities.consumer_units_per_traded_unit.is_some());
        assert_eq!(
            line.monetary_amounts
                .as_ref()
                .unwrap()
                .line_item_amount
                .as_ref()
                .unwrap()
                .value,
            Decimal::new(73550, 2)
        );
        assert!(document
            .monetary_amounts
            .as_ref()
            .unwrap()
            .message_total
            .is_some());
    }

    #[test]
    fn test_message_trailer_flushes_last_line() {
        let records = [
            "UNB+UNOA:3+S+R+240115:1030+1'",
            "UNH+1+ORDERS:D:96A:UN'",
            "LIN+1'",
            "LIN+2'",
            "UNT+4+1'",
            "UNZ+1+1'",
        ];
        let interchange = parse(&records).unwrap();
        assert_eq!(interchange.documents[0].line_items.len(), 2);
    }

    #[test]
    fn test_line_segment_outside_line_item() {
        let records = [
            "UNB+UNOA:3+S+R+240115:1030+1'",
            "UNH+1+ORDERS:D:96A:UN'",
            "QTY+21:1'",
        ];
        let err = parse(&records).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Quantity (QTY) found outside a line item (LIN) at record 3 (QTY)"
        );
    }

    #[test]
    fn test_service_string_advice() {
        let records = [
            "UNA:+,? '",
            "UNB+UNOA:3+S+R+240115:1030+1'",
            "UNH+1+ORDERS:D:96A:UN'",
            "FTX+AAI+++Rock ?+ roll'",
            "LIN+1'",
            "PRI+AAA:12,50'",
            "UNT+5+1'",
            "UNZ+1+1'",
        ];
        let interchange = parse(&records).unwrap();
        assert!(interchange.service_advice.is_some());
        let document = &interchange.documents[0];
        assert_eq!(document.free_text[0].line1.as_deref(), Some("Rock + roll"));
        let net = document.line_items[0]
            .prices
            .as_ref()
            .unwrap()
            .net
            .as_ref()
            .unwrap();
        assert_eq!(net.amount, Some(Decimal::new(1250, 2)));
    }

    #[test]
    fn test_service_string_advice_must_come_first() {
        let err = parse(&["UNB+UNOA:3+S+R+240115:1030+1'", "UNA:+.? '"]).unwrap_err();
        assert!(matches!(err, ParseError::OrderingViolation(_, _)));
    }

    #[test]
    fn test_service_string_advice_only_once() {
        let records = [
            "UNA:+.? '",
            "UNA*|.? '",
            "UNB|UNOA*3|S|R|240115*1030|1'",
            "UNZ|0|1'",
        ];
        let err = parse(&records).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Service string advice (UNA) found more than once at record 2 (UNA)"
        );
    }

    #[test]
    fn test_terminator_only_record_is_blank() {
        let mut records = MINIMAL.to_vec();
        records.push("'");
        assert!(parse(&records).is_ok());

        let mut records = MINIMAL.to_vec();
        records.insert(2, "'\r\n");
        let err = parse(&records).unwrap_err();
        assert_eq!(err.to_string(), "Unknown segment <> at record 3");
    }

    #[test]
    fn test_trailing_blank_records() {
        let mut records = MINIMAL.to_vec();
        records.extend(["", "  \r\n"]);
        assert!(parse(&records).is_ok());
    }

    #[test]
    fn test_blank_record_before_content() {
        let mut records = MINIMAL.to_vec();
        records.insert(2, "");
        let err = parse(&records).unwrap_err();
        assert_eq!(err.to_string(), "Unknown segment <> at record 3");
    }

    #[test]
    fn test_missing_interchange_trailer() {
        let err = parse(&MINIMAL[..7]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Incomplete interchange: missing interchange trailer (UNZ)"
        );
        let err = parse(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Incomplete interchange: no segments found");
    }

    #[test]
    fn test_segment_after_interchange_trailer() {
        let mut records = MINIMAL.to_vec();
        records.push("UNH+2+ORDERS:D:96A:UN'");
        let err = parse(&records).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Segment after the interchange trailer (UNZ) at record 9 (UNH)"
        );
    }

    #[test]
    fn test_interchange_restart_discards_header() {
        let records = [
            "UNB+UNOA:3+S+R+240115:1030+OLD'",
            "UNB+UNOA:3+S+R+240115:1030+NEW'",
            "UNZ+0+NEW'",
        ];
        let interchange = parse(&records).unwrap();
        assert_eq!(interchange.header.control_reference.as_deref(), Some("NEW"));
        assert!(interchange.documents.is_empty());
    }
}
