//! Message-level descriptive segments: BGM, DTM, FTX, RFF, NAD, CTA, COM, CUX.

use chrono::NaiveDate;
use tracing::debug;

use crate::codes::{
    CommunicationChannel, ContactFunction, DateFormat, DateQualifier, PartyQualifier,
    ReferenceQualifier,
};
use crate::error::{ParseError, Result};
use crate::tokenizer::{component, lenient_date, lenient_number, Elements};

/// BGM: beginning of message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BeginningOfMessage {
    pub message_name: Option<String>,
    pub document_number: Option<String>,
    pub message_function: Option<String>,
    pub response_type: Option<String>,
}

/// DTM: dates in scope, one slot per date qualifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateTimes {
    pub delivery: Option<NaiveDate>,
    pub document: Option<NaiveDate>,
    pub processing_start: Option<NaiveDate>,
    pub processing_end: Option<NaiveDate>,
}

impl DateTimes {
    fn slot(&mut self, qualifier: DateQualifier) -> &mut Option<NaiveDate> {
        match qualifier {
            DateQualifier::Delivery => &mut self.delivery,
            DateQualifier::Document => &mut self.document,
            DateQualifier::ProcessingStart => &mut self.processing_start,
            DateQualifier::ProcessingEnd => &mut self.processing_end,
        }
    }
}

/// FTX: one free text entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreeText {
    pub subject_qualifier: Option<String>,
    pub function: Option<String>,
    pub reference: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
}

/// RFF: references in scope, one slot per reference qualifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct References {
    pub buyer_order_number: Option<String>,
    pub supplier_order_number: Option<String>,
    pub supplier_client_code: Option<String>,
    pub alternative_client_code: Option<String>,
}

/// NAD: parties in scope, one slot per party role.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parties {
    pub buyer: Option<String>,
    pub delivery_point: Option<String>,
    pub seller: Option<String>,
    pub supplier: Option<String>,
}

/// CTA: contact information.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    pub function: Option<ContactFunction>,
    pub department: Option<String>,
    pub name: Option<String>,
}

/// COM: communication numbers, one slot per channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Communication {
    pub email: Option<String>,
    pub telephone: Option<String>,
}

/// CUX: currency details.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Currencies {
    pub usage_qualifier: Option<u32>,
    pub currency_code: Option<String>,
    pub type_qualifier: Option<u32>,
}

/// Decode `BGM+220+PO12345+9`.
pub fn decode_bgm(el: &Elements) -> Result<BeginningOfMessage> {
    Ok(BeginningOfMessage {
        message_name: el.text(1),
        document_number: el.text(2),
        message_function: el.text(3),
        response_type: el.text(4),
    })
}

/// Merge `DTM+137:20240115:102` into the dates in scope.
///
/// A date in an unknown format, or one that does not parse, leaves its
/// slot untouched.
pub fn decode_dtm(el: &Elements, mut dates: DateTimes) -> Result<DateTimes> {
    let parts = el.components(1);
    if parts.len() != 3 {
        return Err(ParseError::malformed(
            "DTM",
            format!("date/time needs 3 components, found {}", parts.len()),
        ));
    }
    let qualifier = DateQualifier::parse(&parts[0])?;
    let date = DateFormat::from_code(&parts[2]).and_then(|f| lenient_date(&parts[1], f.pattern()));
    match date {
        Some(date) => *dates.slot(qualifier) = Some(date),
        None => debug!(qualifier = qualifier.code(), value = %parts[1], "DTM date left unset"),
    }
    Ok(dates)
}

/// Decode `FTX+AAI+1++LINE ONE:LINE TWO`.
pub fn decode_ftx(el: &Elements) -> Result<FreeText> {
    Ok(FreeText {
        subject_qualifier: el.text(1),
        function: el.text(2),
        reference: el.text(3),
        line1: el.component(4, 0),
        line2: el.component(4, 1),
    })
}

/// Merge `RFF+ON:PO12345` into the references in scope.
pub fn decode_rff(el: &Elements, mut refs: References) -> Result<References> {
    let parts = el.components(1);
    if parts.len() < 2 {
        return Err(ParseError::malformed(
            "RFF",
            "reference needs a qualifier and a value",
        ));
    }
    let value = component(&parts, 1);
    match ReferenceQualifier::parse(&parts[0])? {
        ReferenceQualifier::BuyerOrder => refs.buyer_order_number = value,
        ReferenceQualifier::SupplierOrder => refs.supplier_order_number = value,
        ReferenceQualifier::SupplierClientCode => refs.supplier_client_code = value,
        ReferenceQualifier::AlternativeClientCode => refs.alternative_client_code = value,
    }
    Ok(refs)
}

/// Merge `NAD+BY+5012345000001::9` into the parties in scope.
pub fn decode_nad(el: &Elements, mut parties: Parties) -> Result<Parties> {
    let code = el
        .text(1)
        .ok_or_else(|| ParseError::malformed("NAD", "missing party qualifier"))?;
    let qualifier = PartyQualifier::parse(&code)?;
    let Some(id) = el.component(2, 0) else {
        return Ok(parties);
    };
    match qualifier {
        PartyQualifier::Buyer => parties.buyer = Some(id),
        PartyQualifier::DeliveryPoint => parties.delivery_point = Some(id),
        PartyQualifier::Seller => parties.seller = Some(id),
        PartyQualifier::Supplier => parties.supplier = Some(id),
    }
    Ok(parties)
}

/// Merge `CTA+OC+:CONTACT BRANCH` into the contact in scope.
pub fn decode_cta(el: &Elements, mut contact: Contact) -> Result<Contact> {
    let code = el
        .text(1)
        .ok_or_else(|| ParseError::malformed("CTA", "missing contact function"))?;
    contact.function = Some(ContactFunction::parse(&code)?);

    let details = el.components(2);
    if details.is_empty() {
        return Err(ParseError::malformed(
            "CTA",
            "missing department or employee",
        ));
    }
    if let Some(department) = component(&details, 0) {
        contact.department = Some(department);
    }
    if let Some(name) = component(&details, 1) {
        contact.name = Some(name);
    }
    Ok(contact)
}

/// Merge `COM+STORE8021@EXAMPLE.IE:EM` into the communication numbers in scope.
pub fn decode_com(el: &Elements, mut com: Communication) -> Result<Communication> {
    let parts = el.components(1);
    if parts.len() < 2 {
        return Err(ParseError::malformed(
            "COM",
            "communication contact needs a number and a channel",
        ));
    }
    let number = component(&parts, 0);
    match CommunicationChannel::parse(&parts[1])? {
        CommunicationChannel::Email => com.email = number,
        CommunicationChannel::Telephone => com.telephone = number,
    }
    Ok(com)
}

/// Merge `CUX+2:EUR:9` into the currency details in scope.
pub fn decode_cux(el: &Elements, mut cux: Currencies) -> Result<Currencies> {
    let parts = el.components(1);
    if parts.len() > 3 {
        return Err(ParseError::malformed(
            "CUX",
            format!(
                "currency details take at most 3 components, found {}",
                parts.len()
            ),
        ));
    }
    if let Some(usage) = component(&parts, 0) {
        cux.usage_qualifier = Some(lenient_number(&usage));
    }
    if let Some(code) = component(&parts, 1) {
        cux.currency_code = Some(code);
    }
    if let Some(kind) = component(&parts, 2) {
        cux.type_qualifier = Some(lenient_number(&kind));
    }
    Ok(cux)
}
