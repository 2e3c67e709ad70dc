//! Vehicle stock persistence

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::reference::ModelType;
use crate::models::vehicle::{StockTransfer, Vehicle, VehicleStatus};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        model_id: Uuid,
        color_id: Uuid,
        vehicle_type: ModelType,
        chassis_number: String,
        engine_number: String,
        key_number: String,
        battery_number: Option<String>,
        motor_number: Option<String>,
        charger_number: Option<String>,
        branch_id: Uuid,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, model_id, color_id, vehicle_type, chassis_number,
                engine_number, key_number, battery_number, motor_number,
                charger_number, branch_id, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'in_stock', $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(model_id)
        .bind(color_id)
        .bind(vehicle_type)
        .bind(chassis_number)
        .bind(engine_number)
        .bind(key_number)
        .bind(battery_number)
        .bind(motor_number)
        .bind(charger_number)
        .bind(branch_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn chassis_exists(&self, chassis_number: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE chassis_number = $1)")
                .bind(chassis_number)
                .fetch_one(&self.pool)
                .await?;
        Ok(result.0)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vehicle)
    }

    pub async fn find_by_chassis(&self, chassis_number: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE chassis_number = $1")
                .bind(chassis_number)
                .fetch_optional(&self.pool)
                .await?;
        Ok(vehicle)
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(vehicles)
    }

    pub async fn list_by_branch(&self, branch_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE branch_id = $1 ORDER BY created_at DESC",
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(vehicles)
    }

    pub async fn update_status(&self, id: Uuid, status: VehicleStatus) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(vehicle)
    }

    pub async fn create_transfer(
        &self,
        vehicle_id: Uuid,
        from_branch_id: Uuid,
        to_branch_id: Uuid,
        note: Option<String>,
    ) -> Result<StockTransfer, AppError> {
        let transfer = sqlx::query_as::<_, StockTransfer>(
            r#"
            INSERT INTO stock_transfers (
                id, vehicle_id, from_branch_id, to_branch_id, status, note,
                created_at, received_at
            )
            VALUES ($1, $2, $3, $4, 'pending', $5, $6, NULL)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(from_branch_id)
        .bind(to_branch_id)
        .bind(note)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(transfer)
    }

    pub async fn find_transfer(&self, id: Uuid) -> Result<Option<StockTransfer>, AppError> {
        let transfer =
            sqlx::query_as::<_, StockTransfer>("SELECT * FROM stock_transfers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(transfer)
    }

    /// Complete a transfer: the vehicle lands in stock at the destination.
    /// Both rows move in one transaction so a transfer is never `received`
    /// while its vehicle is still `in_transfer` at the source branch.
    pub async fn receive_transfer(&self, id: Uuid) -> Result<StockTransfer, AppError> {
        let mut tx = self.pool.begin().await?;

        let transfer = sqlx::query_as::<_, StockTransfer>(
            r#"
            UPDATE stock_transfers SET status = 'received', received_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE vehicles SET status = 'in_stock', branch_id = $2 WHERE id = $1")
            .bind(transfer.vehicle_id)
            .bind(transfer.to_branch_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(transfer)
    }
}
