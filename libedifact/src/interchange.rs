//! The parsed interchange tree: envelope → documents → line items.

use crate::codes::MessageType;
use crate::delimiters::Delimiters;
use crate::segments::{
    BeginningOfMessage, Communication, Contact, ControlTotal, Currencies, DateTimes, FreeText,
    InterchangeHeader, InterchangeTrailer, ItemDescription, LineIdentification, Measurements,
    MessageHeader, MessageTrailer, MonetaryAmounts, Parties, PriceDetails, ProductIdentification,
    Quantities, References, SectionControl,
};

/// A complete interchange, from UNB to UNZ.
#[derive(Clone, Debug, PartialEq)]
pub struct Interchange {
    /// Service characters announced by a leading UNA, if any.
    pub service_advice: Option<Delimiters>,
    pub header: InterchangeHeader,
    pub documents: Vec<Document>,
    pub trailer: InterchangeTrailer,
}

impl Interchange {
    pub(crate) fn new(service_advice: Option<Delimiters>, header: InterchangeHeader) -> Self {
        Self {
            service_advice,
            header,
            documents: Vec::new(),
            trailer: InterchangeTrailer::default(),
        }
    }

    /// Total line items across all documents.
    pub fn line_item_count(&self) -> usize {
        self.documents.iter().map(|d| d.line_items.len()).sum()
    }
}

/// One message, from UNH to UNT.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub header: MessageHeader,
    pub beginning: Option<BeginningOfMessage>,
    pub date_times: Option<DateTimes>,
    pub free_text: Vec<FreeText>,
    pub references: Option<References>,
    pub parties: Option<Parties>,
    pub contact: Option<Contact>,
    pub communication: Option<Communication>,
    pub currencies: Option<Currencies>,
    /// Message-level amounts, outside any line item.
    pub monetary_amounts: Option<MonetaryAmounts>,
    pub line_items: Vec<LineItem>,
    pub section_control: Option<SectionControl>,
    pub control_total: Option<ControlTotal>,
    pub trailer: MessageTrailer,
}

impl Document {
    pub(crate) fn new(header: MessageHeader) -> Self {
        Self {
            header,
            beginning: None,
            date_times: None,
            free_text: Vec::new(),
            references: None,
            parties: None,
            contact: None,
            communication: None,
            currencies: None,
            monetary_amounts: None,
            line_items: Vec::new(),
            section_control: None,
            control_total: None,
            trailer: MessageTrailer::default(),
        }
    }

    pub fn message_type(&self) -> Option<&MessageType> {
        self.header.message_type.as_ref()
    }
}

/// One line of a message, from LIN up to the next LIN, UNS, CNT or UNT.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    pub line: LineIdentification,
    pub product: Option<ProductIdentification>,
    pub description: Option<ItemDescription>,
    pub quantities: Option<Quantities>,
    pub monetary_amounts: Option<MonetaryAmounts>,
    pub measurements: Option<Measurements>,
    pub prices: Option<PriceDetails>,
}

impl LineItem {
    pub(crate) fn new(line: LineIdentification) -> Self {
        Self {
            line,
            product: None,
            description: None,
            quantities: None,
            monetary_amounts: None,
            measurements: None,
            prices: None,
        }
    }
}
