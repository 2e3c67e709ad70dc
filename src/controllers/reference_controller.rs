use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::CustomerType;
use crate::models::reference::{
    Accessory, Branch, Color, Declaration, Financer, PricedHeader, SalesExecutive, VehicleModel,
};
use crate::repositories::reference_repository::ReferenceRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct ReferenceController {
    repository: ReferenceRepository,
}

impl ReferenceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReferenceRepository::new(pool),
        }
    }

    pub async fn list_branches(&self) -> Result<Vec<Branch>, AppError> {
        self.repository.find_branches().await
    }

    pub async fn list_models(
        &self,
        customer_type: Option<CustomerType>,
    ) -> Result<Vec<VehicleModel>, AppError> {
        self.repository.find_models(customer_type).await
    }

    pub async fn price_sheet(&self, model_id: Uuid) -> Result<Vec<PricedHeader>, AppError> {
        self.repository
            .find_model(model_id)
            .await?
            .ok_or_else(|| not_found_error("Model", &model_id.to_string()))?;

        self.repository.find_price_sheet(model_id).await
    }

    pub async fn colors_for_model(&self, model_id: Uuid) -> Result<Vec<Color>, AppError> {
        self.repository.find_colors_for_model(model_id).await
    }

    pub async fn accessories_for_model(&self, model_id: Uuid) -> Result<Vec<Accessory>, AppError> {
        self.repository.find_accessories_for_model(model_id).await
    }

    pub async fn list_accessories(&self) -> Result<Vec<Accessory>, AppError> {
        self.repository.find_accessories().await
    }

    pub async fn declarations(&self, form_type: &str) -> Result<Vec<Declaration>, AppError> {
        self.repository.find_declarations(form_type).await
    }

    pub async fn list_financers(&self) -> Result<Vec<Financer>, AppError> {
        self.repository.find_financers().await
    }

    pub async fn sales_executives_for_branch(
        &self,
        branch_id: Uuid,
    ) -> Result<Vec<SalesExecutive>, AppError> {
        self.repository
            .find_sales_executives_by_branch(branch_id)
            .await
    }
}
