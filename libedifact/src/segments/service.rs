//! Envelope and control segments: UNB, UNH, UNS, CNT, UNT, UNZ.

use chrono::NaiveDateTime;

use crate::codes::{ControlQualifier, MessageType, SectionId};
use crate::error::{ParseError, Result};
use crate::tokenizer::{component, lenient_datetime, lenient_number, Elements};

/// UNB: interchange header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterchangeHeader {
    pub syntax_identifier: Option<String>,
    pub syntax_version: u32,
    pub sender_id: Option<String>,
    pub sender_qualifier: Option<String>,
    pub reverse_routing_address: Option<String>,
    pub recipient_id: Option<String>,
    pub recipient_qualifier: Option<String>,
    pub routing_address: Option<String>,
    /// Date and time of preparation, unset when unparsable.
    pub prepared_at: Option<NaiveDateTime>,
    pub control_reference: Option<String>,
    pub application_reference: Option<String>,
    pub acknowledgement_request: Option<u32>,
    pub test_indicator: Option<String>,
}

/// UNH: message header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageHeader {
    pub message_reference: Option<String>,
    pub message_type: Option<MessageType>,
    pub version: Option<String>,
    pub release: Option<String>,
    pub controlling_agency: Option<String>,
    pub association_code: Option<String>,
    pub common_access_reference: Option<String>,
}

/// UNS: section control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionControl {
    pub section: SectionId,
}

/// CNT: control total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlTotal {
    pub qualifier: ControlQualifier,
    pub count: usize,
}

/// UNT: message trailer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageTrailer {
    pub segment_count: usize,
    pub message_reference: Option<String>,
}

/// UNZ: interchange trailer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterchangeTrailer {
    pub message_count: usize,
    pub control_reference: Option<String>,
}

/// Decode `UNB+UNOA:3+SENDER:14+RECIPIENT:14+240115:1030+REF...`.
pub fn decode_unb(el: &Elements) -> Result<InterchangeHeader> {
    let mut header = InterchangeHeader::default();

    let syntax = el.components(1);
    if syntax.len() != 2 {
        return Err(ParseError::malformed(
            "UNB",
            format!(
                "syntax identifier needs 2 components, found {}",
                syntax.len()
            ),
        ));
    }
    header.syntax_identifier = component(&syntax, 0);
    header.syntax_version = lenient_number(&syntax[1]);

    let sender = el.components(2);
    if sender.is_empty() {
        return Err(ParseError::malformed("UNB", "missing interchange sender"));
    }
    header.sender_id = component(&sender, 0);
    header.sender_qualifier = component(&sender, 1);
    header.reverse_routing_address = component(&sender, 2);

    let recipient = el.components(3);
    if recipient.is_empty() {
        return Err(ParseError::malformed("UNB", "missing interchange recipient"));
    }
    header.recipient_id = component(&recipient, 0);
    header.recipient_qualifier = component(&recipient, 1);
    header.routing_address = component(&recipient, 2);

    let prepared = el.components(4);
    if prepared.len() != 2 {
        return Err(ParseError::malformed(
            "UNB",
            format!(
                "date and time of preparation needs 2 components, found {}",
                prepared.len()
            ),
        ));
    }
    header.prepared_at = lenient_datetime(&format!("{}{}", prepared[0], prepared[1]), "%y%m%d%H%M");

    header.control_reference = el.text(5);
    header.application_reference = el.text(7);
    header.acknowledgement_request = el.text(9).map(|s| lenient_number(&s));
    header.test_indicator = el.text(11);

    Ok(header)
}

/// Decode `UNH+1+ORDERS:D:96A:UN:EAN008`.
pub fn decode_unh(el: &Elements) -> Result<MessageHeader> {
    let identifier = el.components(2);
    Ok(MessageHeader {
        message_reference: el.text(1),
        message_type: component(&identifier, 0).map(|t| MessageType::classify(&t)),
        version: component(&identifier, 1),
        release: component(&identifier, 2),
        controlling_agency: component(&identifier, 3),
        association_code: component(&identifier, 4),
        common_access_reference: el.text(3),
    })
}

/// Decode `UNS+S`.
pub fn decode_uns(el: &Elements) -> Result<SectionControl> {
    let code = el
        .text(1)
        .ok_or_else(|| ParseError::malformed("UNS", "missing section identifier"))?;
    Ok(SectionControl {
        section: SectionId::parse(&code)?,
    })
}

/// Decode `CNT+2:12`.
pub fn decode_cnt(el: &Elements) -> Result<ControlTotal> {
    let parts = el.components(1);
    if parts.len() < 2 {
        return Err(ParseError::malformed(
            "CNT",
            "control total needs a qualifier and a value",
        ));
    }
    Ok(ControlTotal {
        qualifier: ControlQualifier::parse(&parts[0])?,
        count: lenient_number(&parts[1]),
    })
}

/// Decode `UNT+32+1`.
pub fn decode_unt(el: &Elements) -> Result<MessageTrailer> {
    Ok(MessageTrailer {
        segment_count: el.text(1).map(|s| lenient_number(&s)).unwrap_or_default(),
        message_reference: el.text(2),
    })
}

/// Decode `UNZ+1+REF`.
pub fn decode_unz(el: &Elements) -> Result<InterchangeTrailer> {
    Ok(InterchangeTrailer {
        message_count: el.text(1).map(|s| lenient_number(&s)).unwrap_or_default(),
        control_reference: el.text(2),
    })
}
