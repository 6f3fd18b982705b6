//! Closed code lists for coded qualifier elements.
//!
//! Every list parses through `parse`, which rejects codes outside the list
//! with [`ParseError::UnrecognizedCode`]. `from_code` is the non-failing
//! lookup for the few places where an unknown code only leaves a field
//! unset.

use crate::error::{ParseError, Result};

macro_rules! code_list {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Name used in error messages.
            pub const WHAT: &'static str = $what;

            /// Look a code up without failing.
            pub fn from_code(code: &str) -> Option<Self> {
                match code.trim() {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Look a code up, rejecting anything outside the list.
            pub fn parse(code: &str) -> Result<Self> {
                Self::from_code(code).ok_or_else(|| ParseError::unrecognized(Self::WHAT, code))
            }

            /// The code as it appears in the interchange.
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }
    };
}

code_list! {
    /// NAD party function (3035).
    PartyQualifier, "NAD party qualifier" {
        Buyer = "BY",
        DeliveryPoint = "DP",
        Seller = "SE",
        Supplier = "SU",
    }
}

code_list! {
    /// CTA contact function (3139).
    ContactFunction, "CTA contact function" {
        /// Accounting contact.
        Accounting = "AD",
        /// Supplier contact.
        Supplier = "SU",
        /// Department or person responsible for processing the order.
        OrderProcessing = "BJ",
        /// After business hours contact.
        AfterHours = "BO",
        /// Information contact.
        Information = "IC",
        /// Order contact.
        Order = "OC",
        /// Purchasing contact.
        Purchasing = "PD",
        /// Sales representative or department.
        SalesRepresentative = "SR",
    }
}

code_list! {
    /// COM communication channel (3155).
    CommunicationChannel, "COM channel qualifier" {
        Email = "EM",
        Telephone = "TE",
    }
}

code_list! {
    /// RFF reference function (1153).
    ReferenceQualifier, "RFF reference qualifier" {
        /// Buyer's order number.
        BuyerOrder = "ON",
        /// Supplier's order number.
        SupplierOrder = "SS",
        /// Supplier's client code for the buyer.
        SupplierClientCode = "CR",
        /// Supplier's alternative client code for the buyer.
        AlternativeClientCode = "API",
    }
}

code_list! {
    /// DTM date function (2005).
    DateQualifier, "DTM date qualifier" {
        Delivery = "64",
        Document = "137",
        ProcessingStart = "194",
        ProcessingEnd = "206",
    }
}

code_list! {
    /// DTM date format (2379).
    DateFormat, "DTM format qualifier" {
        Ccyymmdd = "102",
        Ccyymmdd202 = "202",
    }
}

impl DateFormat {
    /// The chrono pattern for this format.
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Ccyymmdd | DateFormat::Ccyymmdd202 => "%Y%m%d",
        }
    }
}

code_list! {
    /// QTY quantity type (6063).
    QuantityQualifier, "QTY quantity qualifier" {
        Ordered = "21",
        ConsumerUnitsPerTradedUnit = "59",
    }
}

code_list! {
    /// MOA amount type (5025).
    MonetaryQualifier, "MOA amount qualifier" {
        Discount = "52",
        GoodsItemTotal = "66",
        LineItemsTotal = "79",
        MessageTotal = "86",
        Total = "128",
        LineItemAmount = "203",
    }
}

code_list! {
    /// MEA measurement purpose (6311).
    MeasurementPurpose, "MEA purpose qualifier" {
        Measurement = "AAE",
        Counts = "CT",
        PhysicalDimensions = "PD",
    }
}

code_list! {
    /// MEA measured dimension (6313).
    MeasuredDimension, "MEA dimension" {
        UnitNetWeight = "AAA",
        UnitGrossWeight = "AAB",
        GrossVolume = "AAW",
        Height = "HT",
        Length = "LN",
        Width = "WD",
    }
}

code_list! {
    /// PRI price basis (5125).
    PriceQualifier, "PRI price qualifier" {
        /// Net price including allowances and charges.
        Net = "AAA",
        /// Gross price to which allowances and charges still apply.
        Gross = "AAB",
    }
}

code_list! {
    /// UNS section identification (0081).
    SectionId, "UNS section identifier" {
        Detail = "D",
        Summary = "S",
    }
}

code_list! {
    /// CNT control total type (6069).
    ControlQualifier, "CNT control qualifier" {
        LineItems = "2",
    }
}

/// Message type from the UNH message identifier.
///
/// Unlike the code lists above this never fails: anything that is not a
/// known type is carried through as `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    Orders,
    Other(String),
}

impl MessageType {
    pub fn classify(code: &str) -> Self {
        match code.trim() {
            "ORDERS" => MessageType::Orders,
            other => MessageType::Other(other.to_string()),
        }
    }
}
