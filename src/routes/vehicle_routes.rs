use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    CreateTransferRequest, CreateVehicleRequest, TransferResponse, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::SessionUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/transfers", post(create_transfer))
        .route("/transfers/:id/receive", put(receive_transfer))
        .route("/by-chassis/:chassis_number", get(get_vehicle_by_chassis))
        .route("/:id", get(get_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleResponse>>), AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
struct VehicleQuery {
    branch_id: Option<Uuid>,
}

/// Stock list. Branch-scoped users see their own branch; admins may pass
/// any branch or none for the full stock.
async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<VehicleQuery>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let branch_id = if user.is_branch_scoped() {
        Some(user.branch_id)
    } else {
        query.branch_id
    };
    Ok(Json(controller.list(branch_id).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.get(id).await?))
}

async fn get_vehicle_by_chassis(
    State(state): State<AppState>,
    Path(chassis_number): Path<String>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.get_by_chassis(&chassis_number).await?))
}

async fn create_transfer(
    State(state): State<AppState>,
    Json(request): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransferResponse>>), AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create_transfer(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn receive_transfer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.receive_transfer(id).await?))
}
