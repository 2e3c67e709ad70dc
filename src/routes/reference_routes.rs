use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::reference_controller::ReferenceController;
use crate::models::booking::CustomerType;
use crate::models::reference::{
    Accessory, Branch, Color, Declaration, Financer, PricedHeader, SalesExecutive, VehicleModel,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reference_router() -> Router<AppState> {
    Router::new()
        .route("/branches", get(list_branches))
        .route("/branches/:id/sales-executives", get(sales_executives))
        .route("/models", get(list_models))
        .route("/models/:id/price-sheet", get(price_sheet))
        .route("/models/:id/colors", get(colors))
        .route("/models/:id/accessories", get(accessories))
        .route("/accessories", get(list_accessories))
        .route("/financers", get(list_financers))
        .route("/declarations", get(declarations))
}

#[derive(Debug, Deserialize)]
struct ModelQuery {
    customer_type: Option<CustomerType>,
}

async fn list_branches(State(state): State<AppState>) -> Result<Json<Vec<Branch>>, AppError> {
    let controller = ReferenceController::new(state.pool.clone());
    Ok(Json(controller.list_branches().await?))
}

async fn list_models(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
) -> Result<Json<Vec<VehicleModel>>, AppError> {
    let controller = ReferenceController::new(state.pool.clone());
    Ok(Json(controller.list_models(query.customer_type).await?))
}

async fn price_sheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PricedHeader>>, AppError> {
    let controller = ReferenceController::new(state.pool.clone());
    Ok(Json(controller.price_sheet(id).await?))
}

async fn colors(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Color>>, AppError> {
    let controller = ReferenceController::new(state.pool.clone());
    Ok(Json(controller.colors_for_model(id).await?))
}

async fn accessories(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Accessory>>, AppError> {
    let controller = ReferenceController::new(state.pool.clone());
    Ok(Json(controller.accessories_for_model(id).await?))
}

async fn list_accessories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Accessory>>, AppError> {
    let controller = ReferenceController::new(state.pool.clone());
    Ok(Json(controller.list_accessories().await?))
}

async fn list_financers(State(state): State<AppState>) -> Result<Json<Vec<Financer>>, AppError> {
    let controller = ReferenceController::new(state.pool.clone());
    Ok(Json(controller.list_financers().await?))
}

#[derive(Debug, Deserialize)]
struct DeclarationQuery {
    form_type: String,
}

async fn declarations(
    State(state): State<AppState>,
    Query(query): Query<DeclarationQuery>,
) -> Result<Json<Vec<Declaration>>, AppError> {
    let controller = ReferenceController::new(state.pool.clone());
    Ok(Json(controller.declarations(&query.form_type).await?))
}

async fn sales_executives(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SalesExecutive>>, AppError> {
    let controller = ReferenceController::new(state.pool.clone());
    Ok(Json(controller.sales_executives_for_branch(id).await?))
}
