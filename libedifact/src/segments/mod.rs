//! Typed segment values and their decoders.
//!
//! Each decoder takes the tokenized record and returns a typed value.
//! Merge-accumulating kinds also take the value already in scope (or its
//! default) and return it updated, so a later record of the same kind
//! adds to the earlier one instead of replacing it.

mod header;
mod line;
mod service;

pub use header::{
    decode_bgm, decode_com, decode_cta, decode_cux, decode_dtm, decode_ftx, decode_nad, decode_rff,
    BeginningOfMessage, Communication, Contact, Currencies, DateTimes, FreeText, Parties,
    References,
};
pub use line::{
    decode_imd, decode_lin, decode_mea, decode_moa, decode_pia, decode_pri, decode_qty, Amount,
    ItemDescription, LineIdentification, Measure, Measurements, MonetaryAmounts, Price,
    PriceDetails, ProductIdentification, Quantities, Quantity,
};
pub use service::{
    decode_cnt, decode_unb, decode_unh, decode_uns, decode_unt, decode_unz, ControlTotal,
    InterchangeHeader, InterchangeTrailer, MessageHeader, MessageTrailer, SectionControl,
};

use crate::segment::SegmentKind;

/// A decoded segment value.
pub trait Segment {
    /// The kind tag shared by every value of this type.
    const KIND: SegmentKind;
}

macro_rules! impl_segment {
    ($($ty:ty => $kind:ident,)+) => {
        $(impl Segment for $ty {
            const KIND: SegmentKind = SegmentKind::$kind;
        })+
    };
}

impl_segment! {
    InterchangeHeader => Unb,
    MessageHeader => Unh,
    BeginningOfMessage => Bgm,
    DateTimes => Dtm,
    FreeText => Ftx,
    References => Rff,
    Parties => Nad,
    Contact => Cta,
    Communication => Com,
    Currencies => Cux,
    LineIdentification => Lin,
    ProductIdentification => Pia,
    ItemDescription => Imd,
    Quantities => Qty,
    MonetaryAmounts => Moa,
    Measurements => Mea,
    PriceDetails => Pri,
    SectionControl => Uns,
    ControlTotal => Cnt,
    MessageTrailer => Unt,
    InterchangeTrailer => Unz,
}
