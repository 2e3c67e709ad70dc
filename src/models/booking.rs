//! Booking model
//!
//! One vehicle sale in progress or completed. The wizard assembles the
//! nested sub-records client-side; they are persisted as JSONB on the
//! booking row and fetched back whole for document rendering.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Customer segment of the booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum CustomerType {
    #[serde(rename = "B2B")]
    #[sqlx(rename = "B2B")]
    B2b,
    #[serde(rename = "B2C")]
    #[sqlx(rename = "B2C")]
    B2c,
    #[serde(rename = "CSD")]
    #[sqlx(rename = "CSD")]
    Csd,
}

/// Registration jurisdiction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum RtoType {
    #[serde(rename = "MH")]
    #[sqlx(rename = "MH")]
    Mh,
    #[serde(rename = "BH")]
    #[sqlx(rename = "BH")]
    Bh,
    #[serde(rename = "CRTM")]
    #[sqlx(rename = "CRTM")]
    Crtm,
}

impl RtoType {
    /// BH and CRTM registrations carry an explicit RTO amount
    pub fn requires_amount(self) -> bool {
        matches!(self, RtoType::Bh | RtoType::Crtm)
    }
}

impl Default for RtoType {
    fn default() -> Self {
        RtoType::Mh
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "CASH")]
    Cash,
    #[serde(rename = "FINANCE")]
    Finance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Fixed,
    Percent,
}

impl Default for DiscountType {
    fn default() -> Self {
        DiscountType::Fixed
    }
}

/// KYC / personal details sub-record.
///
/// Form fields arrive as strings; empty string means "not provided", as in
/// the capture form. The stage-3 wizard guard enforces presence and format
/// before anything is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerDetails {
    pub salutation: String,
    pub name: String,
    pub address: String,
    pub mobile1: String,
    pub mobile2: String,
    pub aadhar_number: String,
    pub pan_no: String,
    pub dob: String,
    pub occupation: String,
    pub taluka: String,
    pub district: String,
    pub pincode: String,
    pub nominee_name: String,
    pub nominee_relation: String,
    pub nominee_age: String,
}

/// Payment sub-record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentDetails {
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
    pub financer_id: Option<Uuid>,
    pub scheme: String,
    pub emi_plan: String,
    /// Gold-coin incentive applicability (finance schemes)
    pub gc_applicable: bool,
    pub gc_amount: Option<Decimal>,
}

/// Discount sub-record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscountDetails {
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub value: Option<Decimal>,
}

/// Exchange (old vehicle trade-in) sub-record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeDetails {
    pub applicable: bool,
    pub broker_id: Option<Uuid>,
    pub price: Option<Decimal>,
    pub vehicle_number: String,
    pub chassis_number: String,
    pub otp: String,
}

/// One priced header attached to the booking, snapshotted from the model's
/// price sheet at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceComponentRecord {
    pub header_id: Uuid,
    pub key: String,
    pub hsn_code: String,
    pub gst_rate: Decimal,
    pub original_value: Decimal,
    pub discounted_value: Decimal,
}

/// Persisted booking row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub booking_number: String,
    pub customer_type: CustomerType,
    pub model_id: Uuid,
    pub model_name: String,
    pub color_id: Uuid,
    pub color_name: String,
    pub branch_id: Uuid,
    pub gstin: Option<String>,
    pub rto_type: RtoType,
    pub rto_amount: Option<Decimal>,
    pub sales_executive_id: Uuid,
    pub customer_details: Json<CustomerDetails>,
    pub payment: Json<PaymentDetails>,
    pub discount: Json<DiscountDetails>,
    pub exchange: Json<ExchangeDetails>,
    pub accessory_ids: Json<Vec<Uuid>>,
    pub price_components: Json<Vec<PriceComponentRecord>>,
    pub hpa: bool,
    pub note: Option<String>,
    /// Chassis of the allotted stock vehicle, once assigned
    pub chassis_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_type_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&CustomerType::B2b).unwrap(), "\"B2B\"");
        let parsed: CustomerType = serde_json::from_str("\"CSD\"").unwrap();
        assert_eq!(parsed, CustomerType::Csd);
    }

    #[test]
    fn test_rto_amount_requirement() {
        assert!(!RtoType::Mh.requires_amount());
        assert!(RtoType::Bh.requires_amount());
        assert!(RtoType::Crtm.requires_amount());
    }

    #[test]
    fn test_customer_details_defaults_to_empty_fields() {
        let details: CustomerDetails = serde_json::from_str("{}").unwrap();
        assert!(details.name.is_empty());
        assert!(details.pan_no.is_empty());
    }

    #[test]
    fn test_payment_type_rename() {
        let payment: PaymentDetails =
            serde_json::from_str(r#"{"type":"FINANCE","gc_applicable":true}"#).unwrap();
        assert_eq!(payment.payment_type, Some(PaymentType::Finance));
        assert!(payment.gc_applicable);
    }
}
