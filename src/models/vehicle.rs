//! Vehicle stock model
//!
//! One physical unit with its identity numbers, its unload location and a
//! lifecycle status driven by inward entry, stock transfer and booking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::reference::ModelType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    #[sqlx(rename = "in_stock")]
    InStock,
    #[sqlx(rename = "in_transfer")]
    InTransfer,
    #[sqlx(rename = "booked")]
    Booked,
    #[sqlx(rename = "delivered")]
    Delivered,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub model_id: Uuid,
    pub color_id: Uuid,
    pub vehicle_type: ModelType,
    pub chassis_number: String,
    pub engine_number: String,
    pub key_number: String,
    // EV-only identity numbers
    pub battery_number: Option<String>,
    pub motor_number: Option<String>,
    pub charger_number: Option<String>,
    /// Unload location
    pub branch_id: Uuid,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    #[sqlx(rename = "pending")]
    Pending,
    #[sqlx(rename = "received")]
    Received,
}

/// A stock movement between branches. The challan document is rendered
/// from this record plus the vehicle's identity numbers.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockTransfer {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub from_branch_id: Uuid,
    pub to_branch_id: Uuid,
    pub status: TransferStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
}
