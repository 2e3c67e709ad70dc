//! User persistence

use sqlx::PgPool;

use crate::models::user::UserWithBranch;
use crate::utils::errors::AppError;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserWithBranch>, AppError> {
        let user = sqlx::query_as::<_, UserWithBranch>(
            r#"
            SELECT u.id, u.full_name, u.email, u.password_hash, u.role,
                   u.branch_id, b.name AS branch_name
            FROM users u
            JOIN branches b ON b.id = u.branch_id
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
