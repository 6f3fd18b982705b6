//! Nesting state for one interchange parse.
//!
//! Three independent flags (envelope, document, line item) plus the
//! running counters the trailers are checked against. Every transition
//! checks its precondition first and fails the parse when it does not
//! hold.

use crate::error::{CountCheck, ParseError, Result};
use crate::segment::SegmentKind;

#[derive(Debug, Default)]
pub struct ParseState {
    envelope_open: bool,
    envelope_closed: bool,
    document_open: bool,
    line_item_open: bool,
    control_total_seen: bool,
    segments_in_document: usize,
    segments_in_envelope: usize,
    line_items_in_document: usize,
    documents_in_envelope: usize,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// UNB. Returns `true` when it restarts an envelope that was already open.
    pub fn open_envelope(&mut self) -> Result<bool> {
        if self.document_open || self.line_item_open {
            return Err(ParseError::ordering(
                "Interchange header (UNB) in the middle of a message",
            ));
        }
        let restarted = self.envelope_open;
        self.envelope_open = true;
        self.document_open = false;
        self.line_item_open = false;
        self.segments_in_envelope = 0;
        self.segments_in_document = 0;
        self.documents_in_envelope = 0;
        Ok(restarted)
    }

    /// UNH.
    pub fn open_document(&mut self) -> Result<()> {
        if !self.envelope_open {
            return Err(ParseError::ordering(
                "Message header (UNH) without an interchange header (UNB)",
            ));
        }
        if self.document_open {
            return Err(ParseError::ordering(
                "Message header (UNH) before the previous message trailer (UNT)",
            ));
        }
        self.document_open = true;
        self.line_item_open = false;
        self.segments_in_document = 0;
        self.line_items_in_document = 0;
        self.documents_in_envelope += 1;
        Ok(())
    }

    /// Any segment that only makes sense inside a message.
    pub fn require_document(&self, kind: SegmentKind) -> Result<()> {
        if !self.document_open {
            return Err(ParseError::ordering(format!(
                "{} found before the start of a message (UNH)",
                kind
            )));
        }
        Ok(())
    }

    /// Header segments (BGM) that must precede the first line item.
    pub fn require_message_header(&self, kind: SegmentKind) -> Result<()> {
        self.require_document(kind)?;
        if self.line_item_open {
            return Err(ParseError::ordering(format!(
                "{} found after the first line item (LIN)",
                kind
            )));
        }
        Ok(())
    }

    /// LIN.
    pub fn open_line_item(&mut self) -> Result<()> {
        if !self.document_open {
            return Err(ParseError::ordering(
                "Line item (LIN) found before the start of a message (UNH)",
            ));
        }
        self.line_item_open = true;
        self.line_items_in_document += 1;
        Ok(())
    }

    /// CNT, before its count is known.
    pub fn close_line_items(&mut self) -> Result<()> {
        if !self.line_item_open {
            return Err(ParseError::ordering(
                "Control total (CNT) found before the start of a line item (LIN)",
            ));
        }
        self.line_item_open = false;
        self.control_total_seen = true;
        Ok(())
    }

    /// CNT, once its count is decoded.
    pub fn verify_line_count(&self, stated: usize) -> Result<()> {
        if stated != self.line_items_in_document {
            return Err(ParseError::count_mismatch(
                CountCheck::LineItems,
                stated,
                self.line_items_in_document,
            ));
        }
        Ok(())
    }

    /// UNT. The stated count includes the trailer itself.
    ///
    /// The document stays open; the caller flushes it and then calls
    /// [`ParseState::finish_document`].
    pub fn close_document(&mut self, stated: usize) -> Result<()> {
        if !self.document_open {
            return Err(ParseError::ordering(
                "Message trailer (UNT) found before the start of a message (UNH)",
            ));
        }
        let read = self.segments_in_document + 1;
        if stated != read {
            return Err(ParseError::count_mismatch(
                CountCheck::DocumentSegments,
                stated,
                read,
            ));
        }
        Ok(())
    }

    pub fn finish_document(&mut self) {
        self.document_open = false;
    }

    /// UNZ.
    pub fn close_envelope(&mut self, stated: usize) -> Result<()> {
        if !self.envelope_open {
            return Err(ParseError::ordering(
                "Interchange trailer (UNZ) without an interchange header (UNB)",
            ));
        }
        if self.control_total_seen && self.line_item_open {
            return Err(ParseError::ordering(
                "Interchange trailer (UNZ) before the last line item was closed (CNT)",
            ));
        }
        if self.document_open {
            return Err(ParseError::ordering(
                "Interchange trailer (UNZ) before the last message trailer (UNT)",
            ));
        }
        if stated != self.documents_in_envelope {
            return Err(ParseError::count_mismatch(
                CountCheck::Documents,
                stated,
                self.documents_in_envelope,
            ));
        }
        self.envelope_open = false;
        self.envelope_closed = true;
        Ok(())
    }

    /// Count one processed segment at every level that is open.
    pub fn record_segment(&mut self) {
        if self.document_open {
            self.segments_in_document += 1;
        }
        if self.envelope_open {
            self.segments_in_envelope += 1;
        }
    }

    pub fn is_envelope_closed(&self) -> bool {
        self.envelope_closed
    }

    pub fn segments_in_envelope(&self) -> usize {
        self.segments_in_envelope
    }

    pub fn documents_in_envelope(&self) -> usize {
        self.documents_in_envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_state() -> ParseState {
        let mut state = ParseState::new();
        state.open_envelope().unwrap();
        state.record_segment();
        state
    }

    #[test]
    fn test_document_requires_envelope() {
        let mut state = ParseState::new();
        assert!(matches!(
            state.open_document(),
            Err(ParseError::OrderingViolation(_, _))
        ));
    }

    #[test]
    fn test_envelope_mid_document_fails() {
        let mut state = open_state();
        state.open_document().unwrap();
        assert!(state.open_envelope().is_err());
    }

    #[test]
    fn test_envelope_restart_is_reported() {
        let mut state = open_state();
        assert!(state.open_envelope().unwrap());
    }

    #[test]
    fn test_document_segment_count_includes_trailer() {
        let mut state = open_state();
        state.open_document().unwrap();
        state.record_segment(); // UNH
        state.record_segment(); // BGM
        assert!(state.close_document(3).is_ok());
        assert!(matches!(
            state.close_document(2),
            Err(ParseError::CountMismatch(CountCheck::DocumentSegments, 2, 3, _))
        ));
    }

    #[test]
    fn test_line_items_counted_per_document() {
        let mut state = open_state();
        state.open_document().unwrap();
        state.open_line_item().unwrap();
        state.open_line_item().unwrap();
        state.close_line_items().unwrap();
        assert!(state.verify_line_count(2).is_ok());
        assert!(state.verify_line_count(3).is_err());
    }

    #[test]
    fn test_control_total_needs_line_item() {
        let mut state = open_state();
        state.open_document().unwrap();
        assert!(state.close_line_items().is_err());
    }

    #[test]
    fn test_second_document_resets_line_count() {
        let mut state = open_state();
        state.open_document().unwrap();
        state.open_line_item().unwrap();
        state.finish_document();
        state.open_document().unwrap();
        state.open_line_item().unwrap();
        state.close_line_items().unwrap();
        assert!(state.verify_line_count(1).is_ok());
        assert_eq!(state.documents_in_envelope(), 2);
    }

    #[test]
    fn test_envelope_trailer_checks() {
        let mut state = open_state();
        state.open_document().unwrap();
        assert!(state.close_envelope(1).is_err());
        state.finish_document();
        assert!(matches!(
            state.close_envelope(2),
            Err(ParseError::CountMismatch(CountCheck::Documents, 2, 1, _))
        ));
        state.close_envelope(1).unwrap();
        assert!(state.is_envelope_closed());
    }

    #[test]
    fn test_envelope_trailer_with_open_line_after_control_total() {
        let mut state = open_state();
        state.open_document().unwrap();
        state.open_line_item().unwrap();
        state.close_line_items().unwrap();
        state.open_line_item().unwrap();
        state.finish_document();
        assert!(state.close_envelope(1).is_err());
    }
}
