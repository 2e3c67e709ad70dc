use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Extension, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::document_controller::DocumentController;
use crate::middleware::auth::SessionUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_document_router() -> Router<AppState> {
    Router::new()
        .route("/deal-form/by-chassis/:chassis_number", get(deal_form_by_chassis))
        .route("/deal-form/:booking_id", get(deal_form))
        .route("/helmet-invoice/:booking_id", get(helmet_invoice))
        .route("/accessories-invoice/:booking_id", get(accessories_invoice))
        .route("/challan/:transfer_id", get(challan))
        .route("/day-book", get(day_book))
}

async fn deal_form(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    Ok(Html(controller.deal_form(booking_id).await?))
}

async fn deal_form_by_chassis(
    State(state): State<AppState>,
    Path(chassis_number): Path<String>,
) -> Result<Html<String>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    Ok(Html(controller.deal_form_by_chassis(&chassis_number).await?))
}

async fn helmet_invoice(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    Ok(Html(controller.helmet_invoice(booking_id).await?))
}

async fn accessories_invoice(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    Ok(Html(controller.accessories_invoice(booking_id).await?))
}

async fn challan(
    State(state): State<AppState>,
    Path(transfer_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    Ok(Html(controller.challan(transfer_id).await?))
}

#[derive(Debug, Deserialize)]
struct DayBookQuery {
    date: NaiveDate,
}

/// Day book for the caller's branch
async fn day_book(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<DayBookQuery>,
) -> Result<Html<String>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    Ok(Html(controller.day_book(user.branch_id, query.date).await?))
}
