//! Reference data models
//!
//! Read-only master records that feed the booking wizard selects: branches,
//! vehicle models and their price sheets, colors, accessories, brokers,
//! financers, sales executives and declaration texts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub gstin: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Vehicle model classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum ModelType {
    #[serde(rename = "EV")]
    #[sqlx(rename = "EV")]
    Ev,
    #[serde(rename = "ICE")]
    #[sqlx(rename = "ICE")]
    Ice,
    #[serde(rename = "CSD")]
    #[sqlx(rename = "CSD")]
    Csd,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VehicleModel {
    pub id: Uuid,
    pub name: String,
    pub model_type: ModelType,
    pub discount_percent: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A named, GST-rated price line attachable to a model (e.g. "RTO TAX",
/// "INSURANCE"). Mandatory headers are auto-selected in the wizard and not
/// deselectable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Header {
    pub id: Uuid,
    pub key: String,
    pub gst_rate: Decimal,
    pub hsn_code: String,
    pub is_mandatory: bool,
    pub is_discount: bool,
}

/// A header priced for one model: one line of the model's price sheet
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PricedHeader {
    pub header_id: Uuid,
    pub key: String,
    pub gst_rate: Decimal,
    pub hsn_code: String,
    pub is_mandatory: bool,
    pub is_discount: bool,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Color {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Accessory {
    pub id: Uuid,
    pub name: String,
    pub part_number: String,
    pub price: Decimal,
    pub gst_rate: Decimal,
    pub header_id: Option<Uuid>,
}

/// Exchange broker. `otp_required` gates booking submission behind the OTP
/// handshake when an exchange goes through this broker.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Broker {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub otp_required: bool,
    pub branch_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Financer {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalesExecutive {
    pub id: Uuid,
    pub name: String,
    pub branch_id: Uuid,
    pub active: bool,
    pub frozen: bool,
}

/// Declaration paragraph printed on a document type, ordered by `priority`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Declaration {
    pub id: Uuid,
    pub form_type: String,
    pub content: String,
    pub priority: i32,
}
