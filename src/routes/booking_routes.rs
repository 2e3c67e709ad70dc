use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    AssignVehicleRequest, BookingDraft, BookingResponse, ValidateStageRequest,
    ValidateStageResponse,
};
use crate::middleware::auth::SessionUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/validate-stage", post(validate_stage))
        .route("/search/customers", get(search_customers))
        .route("/by-chassis/:chassis_number", get(get_booking_by_chassis))
        .route("/:id", get(get_booking))
        .route("/:id", put(update_booking))
        .route("/:id/assign-vehicle", put(assign_vehicle))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(draft): Json<BookingDraft>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.create(user.id, draft, &state.otp_store).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn validate_stage(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(request): Json<ValidateStageRequest>,
) -> Result<Json<ValidateStageResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller
        .validate_stage(user.id, request, &state.otp_store)
        .await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.get(id).await?))
}

async fn get_booking_by_chassis(
    State(state): State<AppState>,
    Path(chassis_number): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.get_by_chassis(&chassis_number).await?))
}

async fn update_booking(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller
        .update(user.id, id, draft, &state.otp_store)
        .await?;
    Ok(Json(response))
}

async fn assign_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignVehicleRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller
        .assign_vehicle(id, request.chassis_number.trim())
        .await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
}

/// Lookup-as-you-type customer search. Each keystroke fires this endpoint;
/// the debouncer drops requests superseded within the same session, which
/// answer 204 so the client applies only the last-fired result.
async fn search_customers(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let outcome = state
        .search_debouncer
        .debounce(user.id, || controller.customer_search(&query.q))
        .await;

    match outcome {
        Some(hits) => Ok(Json(hits?).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
