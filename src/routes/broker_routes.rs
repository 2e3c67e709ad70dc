use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::broker_controller::BrokerController;
use crate::dto::broker_dto::{OtpStatusResponse, SendOtpRequest, SendOtpResponse, VerifyOtpRequest};
use crate::middleware::auth::SessionUser;
use crate::models::reference::Broker;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_broker_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brokers))
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/:id/otp-status", get(otp_status))
}

#[derive(Debug, Deserialize)]
struct BrokerQuery {
    branch_id: Option<Uuid>,
}

/// Brokers for the wizard's exchange stage, defaulting to the session branch
async fn list_brokers(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<BrokerQuery>,
) -> Result<Json<Vec<Broker>>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let branch_id = query.branch_id.unwrap_or(user.branch_id);
    Ok(Json(controller.list_by_branch(branch_id).await?))
}

async fn send_otp(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(request): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let response = controller
        .send_otp(
            user.id,
            request.broker_id,
            &state.otp_store,
            state.config.otp_ttl_seconds,
        )
        .await?;
    Ok(Json(response))
}

async fn verify_otp(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<OtpStatusResponse>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let response = controller
        .verify_otp(user.id, request, &state.otp_store)
        .await?;
    Ok(Json(response))
}

async fn otp_status(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<OtpStatusResponse>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let response = controller.otp_status(user.id, id, &state.otp_store).await?;
    Ok(Json(response))
}
