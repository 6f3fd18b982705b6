//! Segment tag classification.

use std::fmt;

/// Every segment kind the parser understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Una,
    Unb,
    Unh,
    Bgm,
    Dtm,
    Ftx,
    Rff,
    Nad,
    Cta,
    Com,
    Cux,
    Lin,
    Pia,
    Imd,
    Qty,
    Moa,
    Mea,
    Pri,
    Uns,
    Cnt,
    Unt,
    Unz,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 22] = [
        SegmentKind::Una,
        SegmentKind::Unb,
        SegmentKind::Unh,
        SegmentKind::Bgm,
        SegmentKind::Dtm,
        SegmentKind::Ftx,
        SegmentKind::Rff,
        SegmentKind::Nad,
        SegmentKind::Cta,
        SegmentKind::Com,
        SegmentKind::Cux,
        SegmentKind::Lin,
        SegmentKind::Pia,
        SegmentKind::Imd,
        SegmentKind::Qty,
        SegmentKind::Moa,
        SegmentKind::Mea,
        SegmentKind::Pri,
        SegmentKind::Uns,
        SegmentKind::Cnt,
        SegmentKind::Unt,
        SegmentKind::Unz,
    ];

    /// The three-letter tag.
    pub fn as_str(self) -> &'static str {
        match self {
            SegmentKind::Una => "UNA",
            SegmentKind::Unb => "UNB",
            SegmentKind::Unh => "UNH",
            SegmentKind::Bgm => "BGM",
            SegmentKind::Dtm => "DTM",
            SegmentKind::Ftx => "FTX",
            SegmentKind::Rff => "RFF",
            SegmentKind::Nad => "NAD",
            SegmentKind::Cta => "CTA",
            SegmentKind::Com => "COM",
            SegmentKind::Cux => "CUX",
            SegmentKind::Lin => "LIN",
            SegmentKind::Pia => "PIA",
            SegmentKind::Imd => "IMD",
            SegmentKind::Qty => "QTY",
            SegmentKind::Moa => "MOA",
            SegmentKind::Mea => "MEA",
            SegmentKind::Pri => "PRI",
            SegmentKind::Uns => "UNS",
            SegmentKind::Cnt => "CNT",
            SegmentKind::Unt => "UNT",
            SegmentKind::Unz => "UNZ",
        }
    }

    /// Human-readable segment name for error messages.
    pub fn name(self) -> &'static str {
        match self {
            SegmentKind::Una => "Service string advice",
            SegmentKind::Unb => "Interchange header",
            SegmentKind::Unh => "Message header",
            SegmentKind::Bgm => "Beginning of message",
            SegmentKind::Dtm => "Date/time",
            SegmentKind::Ftx => "Free text",
            SegmentKind::Rff => "Reference",
            SegmentKind::Nad => "Name and address",
            SegmentKind::Cta => "Contact information",
            SegmentKind::Com => "Communication contact",
            SegmentKind::Cux => "Currencies",
            SegmentKind::Lin => "Line item",
            SegmentKind::Pia => "Additional product id",
            SegmentKind::Imd => "Item description",
            SegmentKind::Qty => "Quantity",
            SegmentKind::Moa => "Monetary amount",
            SegmentKind::Mea => "Measurements",
            SegmentKind::Pri => "Price details",
            SegmentKind::Uns => "Section control",
            SegmentKind::Cnt => "Control total",
            SegmentKind::Unt => "Message trailer",
            SegmentKind::Unz => "Interchange trailer",
        }
    }

    /// Look up a tag exactly.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_str())
    }
}

/// Outcome of classifying a raw record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentTag {
    Known(SegmentKind),
    Invalid,
}

impl SegmentTag {
    /// Classify a record by its first three characters.
    ///
    /// Records shorter than three characters are looked up whole. Blank or
    /// unknown tags are `Invalid`; this never fails.
    pub fn classify(record: &str) -> Self {
        let tag = tag_of(record);
        if tag.trim().is_empty() {
            return SegmentTag::Invalid;
        }
        SegmentKind::from_tag(tag).map_or(SegmentTag::Invalid, SegmentTag::Known)
    }
}

/// The leading tag text of a record, at most three characters.
pub fn tag_of(record: &str) -> &str {
    match record.char_indices().nth(3) {
        Some((end, _)) => &record[..end],
        None => record,
    }
}
