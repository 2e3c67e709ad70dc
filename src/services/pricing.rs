//! Price/GST derivation
//!
//! Pure computation over a fetched booking's price components. Nothing here
//! is persisted: the same figures are re-derived on every request, so the
//! functions must be idempotent over their inputs.
//!
//! Line amounts are GST-inclusive: the taxable value is backed out of the
//! line total and the GST is split equally into CGST and SGST. Accessories
//! billing is the one GST-exclusive surface (tax added on top).

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::booking::PriceComponentRecord;

lazy_static! {
    // Heuristic keyword matches over header keys, as printed on the deal
    // form. Whole-word so e.g. "CARTON" cannot classify as RTO.
    static ref INSURANCE_RE: Regex = Regex::new(r"(?i)\binsurance\b").unwrap();
    static ref RTO_RE: Regex = Regex::new(r"(?i)\brto\b").unwrap();
    static ref HPA_RE: Regex = Regex::new(r"(?i)\bhypothecation\b|\bhpa\b").unwrap();
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Summary bucket a line lands in on the deal form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineBucket {
    /// Itemized in the Total(A) table
    Itemized,
    Insurance,
    Rto,
    Hypothecation,
}

pub fn classify_header(key: &str) -> LineBucket {
    if INSURANCE_RE.is_match(key) {
        LineBucket::Insurance
    } else if RTO_RE.is_match(key) {
        LineBucket::Rto
    } else if HPA_RE.is_match(key) {
        LineBucket::Hypothecation
    } else {
        LineBucket::Itemized
    }
}

/// One derived, display-ready price line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedLine {
    pub key: String,
    pub hsn_code: String,
    pub gst_rate: Decimal,
    pub line_total: Decimal,
    pub taxable_value: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub discount: Decimal,
    pub bucket: LineBucket,
}

/// Derive one line from its price component.
///
/// `lineTotal = discountedValue`,
/// `taxableValue = lineTotal * 100 / (100 + gst_rate)`,
/// `cgst = sgst = (lineTotal - taxableValue) / 2`,
/// `discount = max(originalValue - discountedValue, 0)`.
pub fn derive_line(component: &PriceComponentRecord) -> DerivedLine {
    let line_total = component.discounted_value;
    let taxable_value = line_total * Decimal::from(100) / (Decimal::from(100) + component.gst_rate);
    let total_gst = line_total - taxable_value;
    let half_gst = round2(total_gst / Decimal::from(2));
    let discount = if component.original_value > component.discounted_value {
        component.original_value - component.discounted_value
    } else {
        Decimal::ZERO
    };

    DerivedLine {
        key: component.key.clone(),
        hsn_code: component.hsn_code.clone(),
        gst_rate: component.gst_rate,
        line_total: round2(line_total),
        taxable_value: round2(taxable_value),
        cgst_amount: half_gst,
        sgst_amount: half_gst,
        discount: round2(discount),
        bucket: classify_header(&component.key),
    }
}

/// Aggregated booking price breakdown.
///
/// Insurance, RTO and hypothecation lines leave the itemized Total(A) table
/// and surface as three fixed summary rows forming Total(B).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    /// Itemized lines (the Total(A) table)
    pub lines: Vec<DerivedLine>,
    pub taxable_total: Decimal,
    pub cgst_total: Decimal,
    pub sgst_total: Decimal,
    pub discount_total: Decimal,
    pub total_a: Decimal,
    pub insurance_total: Decimal,
    pub rto_total: Decimal,
    pub hypothecation_total: Decimal,
    pub total_b: Decimal,
    pub grand_total: Decimal,
}

pub fn derive_breakdown(components: &[PriceComponentRecord]) -> PriceBreakdown {
    let mut lines = Vec::new();
    let mut taxable_total = Decimal::ZERO;
    let mut cgst_total = Decimal::ZERO;
    let mut sgst_total = Decimal::ZERO;
    let mut discount_total = Decimal::ZERO;
    let mut total_a = Decimal::ZERO;
    let mut insurance_total = Decimal::ZERO;
    let mut rto_total = Decimal::ZERO;
    let mut hypothecation_total = Decimal::ZERO;

    for component in components {
        let line = derive_line(component);
        discount_total += line.discount;
        match line.bucket {
            LineBucket::Insurance => insurance_total += line.line_total,
            LineBucket::Rto => rto_total += line.line_total,
            LineBucket::Hypothecation => hypothecation_total += line.line_total,
            LineBucket::Itemized => {
                taxable_total += line.taxable_value;
                cgst_total += line.cgst_amount;
                sgst_total += line.sgst_amount;
                total_a += line.line_total;
                lines.push(line);
            }
        }
    }

    let total_b = insurance_total + rto_total + hypothecation_total;

    PriceBreakdown {
        lines,
        taxable_total: round2(taxable_total),
        cgst_total: round2(cgst_total),
        sgst_total: round2(sgst_total),
        discount_total: round2(discount_total),
        total_a: round2(total_a),
        insurance_total: round2(insurance_total),
        rto_total: round2(rto_total),
        hypothecation_total: round2(hypothecation_total),
        total_b: round2(total_b),
        grand_total: round2(total_a + total_b),
    }
}

/// Helmet-invoice rounding: the unit cost is rounded to the nearest rupee
/// and the adjustment is shown as a separate round-off row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HelmetRounding {
    pub round_off: Decimal,
    pub net_total: Decimal,
}

pub fn helmet_rounding(unit_cost: Decimal) -> HelmetRounding {
    let net_total = unit_cost.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    HelmetRounding {
        round_off: net_total - unit_cost,
        net_total,
    }
}

/// One line of an accessories bill (GST-exclusive pricing)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessoryBillingItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub gst_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessoryBillingTotals {
    pub subtotal: Decimal,
    pub gst_total: Decimal,
    pub grand_total: Decimal,
}

pub fn accessories_totals(items: &[AccessoryBillingItem]) -> AccessoryBillingTotals {
    let mut subtotal = Decimal::ZERO;
    let mut gst_total = Decimal::ZERO;

    for item in items {
        let line_amount = item.price * Decimal::from(item.quantity);
        subtotal += line_amount;
        gst_total += line_amount * item.gst_rate / Decimal::from(100);
    }

    AccessoryBillingTotals {
        subtotal: round2(subtotal),
        gst_total: round2(gst_total),
        grand_total: round2(subtotal + gst_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn component(key: &str, gst_rate: i64, original: i64, discounted: i64) -> PriceComponentRecord {
        PriceComponentRecord {
            header_id: Uuid::new_v4(),
            key: key.to_string(),
            hsn_code: "8711".to_string(),
            gst_rate: Decimal::from(gst_rate),
            original_value: Decimal::from(original),
            discounted_value: Decimal::from(discounted),
        }
    }

    #[test]
    fn test_derive_line_at_18_percent() {
        let line = derive_line(&component("EX SHOWROOM", 18, 118, 118));
        assert_eq!(line.taxable_value, Decimal::from_str("100.00").unwrap());
        assert_eq!(line.cgst_amount, Decimal::from_str("9.00").unwrap());
        assert_eq!(line.sgst_amount, Decimal::from_str("9.00").unwrap());
        assert_eq!(line.discount, Decimal::ZERO);
    }

    #[test]
    fn test_derive_line_discount_never_negative() {
        let line = derive_line(&component("EX SHOWROOM", 18, 100, 118));
        assert_eq!(line.discount, Decimal::ZERO);

        let line = derive_line(&component("EX SHOWROOM", 18, 120, 118));
        assert_eq!(line.discount, Decimal::from(2));
    }

    #[test]
    fn test_classify_header_keywords() {
        assert_eq!(classify_header("INSURANCE 1ST YEAR"), LineBucket::Insurance);
        assert_eq!(classify_header("rto tax"), LineBucket::Rto);
        assert_eq!(classify_header("HYPOTHECATION CHARGES"), LineBucket::Hypothecation);
        assert_eq!(classify_header("HPA FEE"), LineBucket::Hypothecation);
        assert_eq!(classify_header("EX SHOWROOM"), LineBucket::Itemized);
        // Whole-word: must not match inside another word
        assert_eq!(classify_header("CARTON CHARGES"), LineBucket::Itemized);
    }

    #[test]
    fn test_breakdown_splits_total_a_and_b() {
        let components = vec![
            component("EX SHOWROOM", 28, 1280, 1280),
            component("INSURANCE", 18, 118, 118),
            component("RTO TAX", 0, 500, 500),
            component("HYPOTHECATION", 0, 300, 300),
        ];
        let breakdown = derive_breakdown(&components);

        assert_eq!(breakdown.lines.len(), 1);
        assert_eq!(breakdown.total_a, Decimal::from(1280));
        assert_eq!(breakdown.insurance_total, Decimal::from(118));
        assert_eq!(breakdown.rto_total, Decimal::from(500));
        assert_eq!(breakdown.hypothecation_total, Decimal::from(300));
        assert_eq!(breakdown.total_b, Decimal::from(918));
        assert_eq!(breakdown.grand_total, Decimal::from(2198));
    }

    #[test]
    fn test_breakdown_is_idempotent() {
        let components = vec![
            component("EX SHOWROOM", 28, 128000, 125000),
            component("INSURANCE", 18, 5900, 5900),
            component("RTO TAX", 0, 8000, 8000),
        ];
        let first = derive_breakdown(&components);
        let second = derive_breakdown(&components);
        assert_eq!(first, second);

        let first_json = serde_json::to_string(&first).unwrap();
        let second_json = serde_json::to_string(&second).unwrap();
        assert_eq!(first_json, second_json);
    }

    #[test]
    fn test_helmet_rounding() {
        let rounding = helmet_rounding(Decimal::from_str("678.40").unwrap());
        assert_eq!(rounding.net_total, Decimal::from(678));
        assert_eq!(rounding.round_off, Decimal::from_str("-0.40").unwrap());

        let rounding = helmet_rounding(Decimal::from_str("678.50").unwrap());
        assert_eq!(rounding.net_total, Decimal::from(679));
        assert_eq!(rounding.round_off, Decimal::from_str("0.50").unwrap());
    }

    #[test]
    fn test_accessories_totals() {
        let items = vec![AccessoryBillingItem {
            name: "Helmet".to_string(),
            price: Decimal::from(100),
            quantity: 2,
            gst_rate: Decimal::from(18),
        }];
        let totals = accessories_totals(&items);
        assert_eq!(totals.subtotal, Decimal::from(200));
        assert_eq!(totals.gst_total, Decimal::from(36));
        assert_eq!(totals.grand_total, Decimal::from(236));
    }

    #[test]
    fn test_accessories_totals_empty() {
        let totals = accessories_totals(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.grand_total, Decimal::ZERO);
    }
}
