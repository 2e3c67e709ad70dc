use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::reference::ModelType;
use crate::models::vehicle::{StockTransfer, TransferStatus, Vehicle, VehicleStatus};

// Inward stock entry
#[derive(Debug, Deserialize)]
pub struct CreateVehicleRequest {
    pub model_id: Uuid,
    pub color_id: Uuid,
    pub vehicle_type: ModelType,
    pub chassis_number: String,
    pub engine_number: String,
    pub key_number: String,
    pub battery_number: Option<String>,
    pub motor_number: Option<String>,
    pub charger_number: Option<String>,
    pub branch_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub model_id: Uuid,
    pub color_id: Uuid,
    pub vehicle_type: ModelType,
    pub chassis_number: String,
    pub engine_number: String,
    pub key_number: String,
    pub battery_number: Option<String>,
    pub motor_number: Option<String>,
    pub charger_number: Option<String>,
    pub branch_id: Uuid,
    pub status: VehicleStatus,
}

impl From<Vehicle> for VehicleResponse {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            model_id: v.model_id,
            color_id: v.color_id,
            vehicle_type: v.vehicle_type,
            chassis_number: v.chassis_number,
            engine_number: v.engine_number,
            key_number: v.key_number,
            battery_number: v.battery_number,
            motor_number: v.motor_number,
            charger_number: v.charger_number,
            branch_id: v.branch_id,
            status: v.status,
        }
    }
}

// Stock transfer between branches
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    pub vehicle_id: Uuid,
    pub to_branch_id: Uuid,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub from_branch_id: Uuid,
    pub to_branch_id: Uuid,
    pub status: TransferStatus,
    pub note: Option<String>,
}

impl From<StockTransfer> for TransferResponse {
    fn from(t: StockTransfer) -> Self {
        Self {
            id: t.id,
            vehicle_id: t.vehicle_id,
            from_branch_id: t.from_branch_id,
            to_branch_id: t.to_branch_id,
            status: t.status,
            note: t.note,
        }
    }
}
