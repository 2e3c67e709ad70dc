//! Booking DTOs
//!
//! The wizard submits one nested draft payload; the same shape is used for
//! per-stage validation, create and update.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::{
    Booking, CustomerDetails, CustomerType, DiscountDetails, ExchangeDetails, PaymentDetails,
    PriceComponentRecord, RtoType,
};

/// The wizard's working payload. Every field is optional or defaulted; the
/// stage guards decide what must be present before advancing/submitting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    pub customer_type: Option<CustomerType>,
    pub model_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub gstin: String,
    pub rto_type: RtoType,
    pub rto_amount: Option<Decimal>,
    pub model_color: Option<Uuid>,
    pub sales_executive: Option<Uuid>,
    pub customer_details: CustomerDetails,
    pub payment: PaymentDetails,
    pub discount: DiscountDetails,
    pub accessory_ids: Vec<Uuid>,
    pub exchange: ExchangeDetails,
    pub hpa: bool,
    pub note: String,
    /// Selected optional headers; mandatory headers are attached
    /// server-side regardless.
    pub header_ids: Vec<Uuid>,
}

/// Validate a single wizard stage of a draft
#[derive(Debug, Deserialize)]
pub struct ValidateStageRequest {
    pub stage: u8,
    pub draft: BookingDraft,
}

/// Result of a stage validation: the field error map and, when invalid,
/// the first erroring field so the client can indicate it.
#[derive(Debug, Serialize)]
pub struct ValidateStageResponse {
    pub valid: bool,
    pub errors: crate::utils::validation::FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_field: Option<String>,
}

/// Canonical priced booking, as fed to the derivation engine and the
/// document renderer
#[derive(Debug, Serialize)]
pub struct BookingResponse {
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
    pub customer_details: CustomerDetails,
    pub payment: PaymentDetails,
    pub discount: DiscountDetails,
    pub exchange: ExchangeDetails,
    pub accessory_ids: Vec<Uuid>,
    pub price_components: Vec<PriceComponentRecord>,
    pub hpa: bool,
    pub note: Option<String>,
    pub chassis_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            booking_number: booking.booking_number,
            customer_type: booking.customer_type,
            model_id: booking.model_id,
            model_name: booking.model_name,
            color_id: booking.color_id,
            color_name: booking.color_name,
            branch_id: booking.branch_id,
            gstin: booking.gstin,
            rto_type: booking.rto_type,
            rto_amount: booking.rto_amount,
            sales_executive_id: booking.sales_executive_id,
            customer_details: booking.customer_details.0,
            payment: booking.payment.0,
            discount: booking.discount.0,
            exchange: booking.exchange.0,
            accessory_ids: booking.accessory_ids.0,
            price_components: booking.price_components.0,
            hpa: booking.hpa,
            note: booking.note,
            chassis_number: booking.chassis_number,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Allot a stock vehicle to a submitted booking
#[derive(Debug, Deserialize)]
pub struct AssignVehicleRequest {
    pub chassis_number: String,
}

/// One hit of the debounced customer lookup (PAN / Aadhar / mobile)
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CustomerSearchHit {
    pub booking_id: Uuid,
    pub name: String,
    pub pan_no: String,
    pub aadhar_number: String,
    pub mobile1: String,
}
