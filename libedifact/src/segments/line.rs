//! Line item segments: LIN, PIA, IMD, QTY, MOA, MEA, PRI.

use rust_decimal::Decimal;

use crate::codes::{
    MeasuredDimension, MeasurementPurpose, MonetaryQualifier, PriceQualifier, QuantityQualifier,
};
use crate::error::{ParseError, Result};
use crate::tokenizer::{component, lenient_number, Elements};

/// LIN: line identification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIdentification {
    pub line_number: u32,
    pub action: Option<String>,
    pub product_id: Option<String>,
    pub product_id_type: Option<String>,
}

/// PIA: additional product identification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductIdentification {
    pub function: Option<String>,
    pub item_code: Option<String>,
    pub item_type: Option<String>,
}

/// IMD: item description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemDescription {
    /// `F` free-form, `C` coded, `B` both.
    pub format: Option<String>,
    pub characteristic: Option<String>,
    pub description_code: Option<String>,
    pub description: Option<String>,
}

/// A quantity with its optional unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Quantity {
    pub value: Decimal,
    pub unit: Option<String>,
}

/// QTY: quantities in scope, one slot per quantity qualifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Quantities {
    pub ordered: Option<Quantity>,
    pub consumer_units_per_traded_unit: Option<Quantity>,
}

/// A monetary amount with its optional currency.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Amount {
    pub value: Decimal,
    pub currency: Option<String>,
}

/// MOA: amounts in scope, one slot per amount qualifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonetaryAmounts {
    pub discount: Option<Amount>,
    pub goods_item_total: Option<Amount>,
    pub line_items_total: Option<Amount>,
    pub message_total: Option<Amount>,
    pub total: Option<Amount>,
    pub line_item_amount: Option<Amount>,
}

impl MonetaryAmounts {
    fn slot(&mut self, qualifier: MonetaryQualifier) -> &mut Option<Amount> {
        match qualifier {
            MonetaryQualifier::Discount => &mut self.discount,
            MonetaryQualifier::GoodsItemTotal => &mut self.goods_item_total,
            MonetaryQualifier::LineItemsTotal => &mut self.line_items_total,
            MonetaryQualifier::MessageTotal => &mut self.message_total,
            MonetaryQualifier::Total => &mut self.total,
            MonetaryQualifier::LineItemAmount => &mut self.line_item_amount,
        }
    }
}

/// One measured value with its unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Measure {
    pub unit: Option<String>,
    pub value: Decimal,
}

/// MEA: measurements in scope, one slot per dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Measurements {
    /// Purpose of the most recent measurement.
    pub purpose: Option<MeasurementPurpose>,
    pub net_weight: Option<Measure>,
    pub gross_weight: Option<Measure>,
    pub gross_volume: Option<Measure>,
    pub height: Option<Measure>,
    pub length: Option<Measure>,
    pub width: Option<Measure>,
}

impl Measurements {
    fn slot(&mut self, dimension: MeasuredDimension) -> &mut Option<Measure> {
        match dimension {
            MeasuredDimension::UnitNetWeight => &mut self.net_weight,
            MeasuredDimension::UnitGrossWeight => &mut self.gross_weight,
            MeasuredDimension::GrossVolume => &mut self.gross_volume,
            MeasuredDimension::Height => &mut self.height,
            MeasuredDimension::Length => &mut self.length,
            MeasuredDimension::Width => &mut self.width,
        }
    }
}

/// A price with its optional qualifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Price {
    pub amount: Option<Decimal>,
    pub type_code: Option<String>,
    pub type_qualifier: Option<String>,
    pub unit_price_basis: Option<Decimal>,
    pub unit_qualifier: Option<String>,
}

/// PRI: prices in scope, one slot per price basis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceDetails {
    pub net: Option<Price>,
    pub gross: Option<Price>,
}

/// Decode `LIN+1++5012345678900:EN`.
pub fn decode_lin(el: &Elements) -> Result<LineIdentification> {
    Ok(LineIdentification {
        line_number: el.text(1).map(|s| lenient_number(&s)).unwrap_or_default(),
        action: el.text(2),
        product_id: el.component(3, 0),
        product_id_type: el.component(3, 1),
    })
}

/// Decode `PIA+1+ART-123:SA`.
pub fn decode_pia(el: &Elements) -> Result<ProductIdentification> {
    Ok(ProductIdentification {
        function: el.text(1),
        item_code: el.component(2, 0),
        item_type: el.component(2, 1),
    })
}

/// Decode `IMD+F++:::RED WIDGET 10MM`.
pub fn decode_imd(el: &Elements) -> Result<ItemDescription> {
    let parts = el.components(3);
    Ok(ItemDescription {
        format: el.text(1),
        characteristic: el.text(2),
        description_code: component(&parts, 0),
        description: component(&parts, 3),
    })
}

/// Merge `QTY+21:48:PCE` into the quantities in scope.
pub fn decode_qty(el: &Elements, mut quantities: Quantities) -> Result<Quantities> {
    let parts = el.components(1);
    if parts.len() < 2 {
        return Err(ParseError::malformed(
            "QTY",
            "quantity needs a qualifier and a value",
        ));
    }
    let quantity = Quantity {
        value: el.decimal(&parts[1]),
        unit: component(&parts, 2),
    };
    match QuantityQualifier::parse(&parts[0])? {
        QuantityQualifier::Ordered => quantities.ordered = Some(quantity),
        QuantityQualifier::ConsumerUnitsPerTradedUnit => {
            quantities.consumer_units_per_traded_unit = Some(quantity)
        }
    }
    Ok(quantities)
}

/// Merge `MOA+203:735.50:EUR` into the amounts in scope.
pub fn decode_moa(el: &Elements, mut amounts: MonetaryAmounts) -> Result<MonetaryAmounts> {
    let parts = el.components(1);
    if parts.len() < 2 || parts.len() > 3 {
        return Err(ParseError::malformed(
            "MOA",
            format!(
                "monetary amount needs 2 or 3 components, found {}",
                parts.len()
            ),
        ));
    }
    let qualifier = MonetaryQualifier::parse(&parts[0])?;
    *amounts.slot(qualifier) = Some(Amount {
        value: el.decimal(&parts[1]),
        currency: component(&parts, 2),
    });
    Ok(amounts)
}

/// Merge `MEA+PD+HT+CMT:18.5` into the measurements in scope.
pub fn decode_mea(el: &Elements, mut measurements: Measurements) -> Result<Measurements> {
    let purpose = el
        .text(1)
        .ok_or_else(|| ParseError::malformed("MEA", "missing measurement purpose"))?;
    let dimension = el
        .text(2)
        .ok_or_else(|| ParseError::malformed("MEA", "missing measured dimension"))?;
    let purpose = MeasurementPurpose::parse(&purpose)?;
    let dimension = MeasuredDimension::parse(&dimension)?;

    let value = el.components(3);
    if value.len() < 2 {
        return Err(ParseError::malformed(
            "MEA",
            "measurement needs a unit and a value",
        ));
    }
    measurements.purpose = Some(purpose);
    *measurements.slot(dimension) = Some(Measure {
        unit: component(&value, 0),
        value: el.decimal(&value[1]),
    });
    Ok(measurements)
}

/// Merge `PRI+AAA:618.56::::PCE` into the prices in scope.
pub fn decode_pri(el: &Elements, mut prices: PriceDetails) -> Result<PriceDetails> {
    let parts = el.components(1);
    let code = component(&parts, 0)
        .ok_or_else(|| ParseError::malformed("PRI", "missing price qualifier"))?;
    let qualifier = PriceQualifier::parse(&code)?;
    let price = Price {
        amount: component(&parts, 1).map(|s| el.decimal(&s)),
        type_code: component(&parts, 2),
        type_qualifier: component(&parts, 3),
        unit_price_basis: component(&parts, 4).map(|s| el.decimal(&s)),
        unit_qualifier: component(&parts, 5),
    };
    match qualifier {
        PriceQualifier::Net => prices.net = Some(price),
        PriceQualifier::Gross => prices.gross = Some(price),
    }
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimiters::Delimiters;

    fn elements(record: &str) -> Elements<'_> {
        Elements::new(record, Delimiters::default())
    }

    #[test]
    fn test_decode_lin() {
        let lin = decode_lin(&elements("LIN+1++5012345678900:EN")).unwrap();
        assert_eq!(lin.line_number, 1);
        assert_eq!(lin.action, None);
        assert_eq!(lin.product_id.as_deref(), Some("5012345678900"));
        assert_eq!(lin.product_id_type.as_deref(), Some("EN"));
        assert_eq!(decode_lin(&elements("LIN+x")).unwrap().line_number, 0);
    }

    #[test]
    fn test_decode_pia() {
        let pia = decode_pia(&elements("PIA+1+ART-123:SA")).unwrap();
        assert_eq!(pia.function.as_deref(), Some("1"));
        assert_eq!(pia.item_code.as_deref(), Some("ART-123"));
        assert_eq!(pia.item_type.as_deref(), Some("SA"));
    }

    #[test]
    fn test_decode_imd() {
        let imd = decode_imd(&elements("IMD+F++:::RED WIDGET 10MM")).unwrap();
        assert_eq!(imd.format.as_deref(), Some("F"));
        assert_eq!(imd.description_code, None);
        assert_eq!(imd.description.as_deref(), Some("RED WIDGET 10MM"));
        let imd = decode_imd(&elements("IMD+C++TU")).unwrap();
        assert_eq!(imd.description_code.as_deref(), Some("TU"));
        assert_eq!(imd.description, None);
    }

    #[test]
    fn test_qty_merges_qualifiers() {
        let qty = decode_qty(&elements("QTY+21:48:PCE"), Quantities::default()).unwrap();
        let qty = decode_qty(&elements("QTY+59:12"), qty).unwrap();
        let ordered = qty.ordered.unwrap();
        assert_eq!(ordered.value, Decimal::new(48, 0));
        assert_eq!(ordered.unit.as_deref(), Some("PCE"));
        assert_eq!(
            qty.consumer_units_per_traded_unit.unwrap().value,
            Decimal::new(12, 0)
        );
    }

    #[test]
    fn test_qty_non_numeric_value_defaults_to_zero() {
        let qty = decode_qty(&elements("QTY+21:lots"), Quantities::default()).unwrap();
        assert_eq!(qty.ordered.unwrap().value, Decimal::ZERO);
    }

    #[test]
    fn test_moa_merges_and_validates() {
        let moa = decode_moa(&elements("MOA+203:735.50:EUR"), MonetaryAmounts::default()).unwrap();
        let moa = decode_moa(&elements("MOA+52:10"), moa).unwrap();
        assert_eq!(
            moa.line_item_amount,
            Some(Amount {
                value: Decimal::new(73550, 2),
                currency: Some("EUR".to_string()),
            })
        );
        assert_eq!(moa.discount.unwrap().value, Decimal::new(10, 0));
        assert!(decode_moa(&elements("MOA+203:1:EUR:X"), MonetaryAmounts::default()).is_err());
        assert!(decode_moa(&elements("MOA+203"), MonetaryAmounts::default()).is_err());
        assert!(decode_moa(&elements("MOA+999:1"), MonetaryAmounts::default()).is_err());
    }

    #[test]
    fn test_mea_merges_dimensions() {
        let mea = decode_mea(&elements("MEA+PD+HT+CMT:18.5"), Measurements::default()).unwrap();
        let mea = decode_mea(&elements("MEA+PD+WD+CMT:4"), mea).unwrap();
        assert_eq!(mea.purpose, Some(MeasurementPurpose::PhysicalDimensions));
        assert_eq!(mea.height.unwrap().value, Decimal::new(185, 1));
        assert_eq!(mea.width.unwrap().unit.as_deref(), Some("CMT"));
        assert_eq!(mea.length, None);
    }

    #[test]
    fn test_mea_errors() {
        assert!(matches!(
            decode_mea(&elements("MEA+PD+HT+CMT"), Measurements::default()),
            Err(ParseError::MalformedElement("MEA", _, _))
        ));
        assert!(matches!(
            decode_mea(&elements("MEA+PD+ZZ+CMT:1"), Measurements::default()),
            Err(ParseError::UnrecognizedCode("MEA dimension", _, _))
        ));
    }

    #[test]
    fn test_pri_merges_net_and_gross() {
        let pri = decode_pri(&elements("PRI+AAA:618.56::::PCE"), PriceDetails::default()).unwrap();
        let pri = decode_pri(&elements("PRI+AAB:700"), pri).unwrap();
        let net = pri.net.unwrap();
        assert_eq!(net.amount, Some(Decimal::new(61856, 2)));
        assert_eq!(net.unit_qualifier.as_deref(), Some("PCE"));
        assert_eq!(pri.gross.unwrap().amount, Some(Decimal::new(700, 0)));
    }

    #[test]
    fn test_pri_unknown_qualifier_is_fatal() {
        let err = decode_pri(&elements("PRI+XYZ:1"), PriceDetails::default()).unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized PRI price qualifier \"XYZ\"");
    }
}
