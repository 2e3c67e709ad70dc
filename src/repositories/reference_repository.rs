//! Reference data access
//!
//! Read-only lookups over the master tables feeding the booking wizard.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::CustomerType;
use crate::models::reference::{
    Accessory, Branch, Broker, Color, Declaration, Financer, PricedHeader, SalesExecutive,
    VehicleModel,
};
use crate::utils::errors::AppError;

pub struct ReferenceRepository {
    pool: PgPool,
}

impl ReferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_branches(&self) -> Result<Vec<Branch>, AppError> {
        let branches = sqlx::query_as::<_, Branch>("SELECT * FROM branches ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(branches)
    }

    pub async fn find_branch(&self, id: Uuid) -> Result<Option<Branch>, AppError> {
        let branch = sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(branch)
    }

    /// Models selectable for a customer type: CSD customers see CSD models
    /// only, everyone else sees the non-CSD catalogue.
    pub async fn find_models(
        &self,
        customer_type: Option<CustomerType>,
    ) -> Result<Vec<VehicleModel>, AppError> {
        let models = match customer_type {
            Some(CustomerType::Csd) => {
                sqlx::query_as::<_, VehicleModel>(
                    "SELECT * FROM vehicle_models WHERE model_type = 'CSD' ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
            Some(_) => {
                sqlx::query_as::<_, VehicleModel>(
                    "SELECT * FROM vehicle_models WHERE model_type <> 'CSD' ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, VehicleModel>("SELECT * FROM vehicle_models ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(models)
    }

    pub async fn find_model(&self, id: Uuid) -> Result<Option<VehicleModel>, AppError> {
        let model = sqlx::query_as::<_, VehicleModel>("SELECT * FROM vehicle_models WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(model)
    }

    /// The model's price sheet: every header priced for it
    pub async fn find_price_sheet(&self, model_id: Uuid) -> Result<Vec<PricedHeader>, AppError> {
        let sheet = sqlx::query_as::<_, PricedHeader>(
            r#"
            SELECT h.id AS header_id, h.key, h.gst_rate, h.hsn_code,
                   h.is_mandatory, h.is_discount, mp.value
            FROM model_prices mp
            JOIN headers h ON h.id = mp.header_id
            WHERE mp.model_id = $1
            ORDER BY h.key
            "#,
        )
        .bind(model_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sheet)
    }

    pub async fn find_colors_for_model(&self, model_id: Uuid) -> Result<Vec<Color>, AppError> {
        let colors = sqlx::query_as::<_, Color>(
            r#"
            SELECT c.id, c.name
            FROM model_colors mc
            JOIN colors c ON c.id = mc.color_id
            WHERE mc.model_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(model_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(colors)
    }

    pub async fn find_color(&self, id: Uuid) -> Result<Option<Color>, AppError> {
        let color = sqlx::query_as::<_, Color>("SELECT id, name FROM colors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(color)
    }

    pub async fn find_accessories(&self) -> Result<Vec<Accessory>, AppError> {
        let accessories =
            sqlx::query_as::<_, Accessory>("SELECT * FROM accessories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(accessories)
    }

    pub async fn find_accessories_for_model(
        &self,
        model_id: Uuid,
    ) -> Result<Vec<Accessory>, AppError> {
        let accessories = sqlx::query_as::<_, Accessory>(
            r#"
            SELECT a.*
            FROM accessory_models am
            JOIN accessories a ON a.id = am.accessory_id
            WHERE am.model_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(model_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(accessories)
    }

    pub async fn find_accessories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Accessory>, AppError> {
        let accessories = sqlx::query_as::<_, Accessory>(
            "SELECT * FROM accessories WHERE id = ANY($1) ORDER BY name",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(accessories)
    }

    pub async fn find_brokers(&self) -> Result<Vec<Broker>, AppError> {
        let brokers = sqlx::query_as::<_, Broker>("SELECT * FROM brokers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(brokers)
    }

    pub async fn find_brokers_by_branch(&self, branch_id: Uuid) -> Result<Vec<Broker>, AppError> {
        let brokers =
            sqlx::query_as::<_, Broker>("SELECT * FROM brokers WHERE branch_id = $1 ORDER BY name")
                .bind(branch_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(brokers)
    }

    pub async fn find_broker(&self, id: Uuid) -> Result<Option<Broker>, AppError> {
        let broker = sqlx::query_as::<_, Broker>("SELECT * FROM brokers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(broker)
    }

    pub async fn find_financers(&self) -> Result<Vec<Financer>, AppError> {
        let financers = sqlx::query_as::<_, Financer>("SELECT * FROM financers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(financers)
    }

    /// Active, non-frozen executives for a branch
    pub async fn find_sales_executives_by_branch(
        &self,
        branch_id: Uuid,
    ) -> Result<Vec<SalesExecutive>, AppError> {
        let executives = sqlx::query_as::<_, SalesExecutive>(
            r#"
            SELECT * FROM sales_executives
            WHERE branch_id = $1 AND active = TRUE AND frozen = FALSE
            ORDER BY name
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(executives)
    }

    pub async fn count_active_sales_executives(&self, branch_id: Uuid) -> Result<usize, AppError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM sales_executives
            WHERE branch_id = $1 AND active = TRUE AND frozen = FALSE
            "#,
        )
        .bind(branch_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 as usize)
    }

    pub async fn find_declarations(&self, form_type: &str) -> Result<Vec<Declaration>, AppError> {
        let declarations = sqlx::query_as::<_, Declaration>(
            "SELECT * FROM declarations WHERE form_type = $1 ORDER BY priority",
        )
        .bind(form_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(declarations)
    }
}
