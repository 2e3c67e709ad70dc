//! Back-office user model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Back-office roles. Sales executives are branch-scoped: their session
/// branch pre-fills branch-bound wizard fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sqlx(rename = "admin")]
    Admin,
    #[sqlx(rename = "sales_executive")]
    SalesExecutive,
    #[sqlx(rename = "accountant")]
    Accountant,
}

impl UserRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(UserRole::Admin),
            "sales_executive" => Some(UserRole::SalesExecutive),
            "accountant" => Some(UserRole::Accountant),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::SalesExecutive => "sales_executive",
            UserRole::Accountant => "accountant",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub branch_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// User joined with their branch name, as loaded at login
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserWithBranch {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub branch_id: Uuid,
    pub branch_name: String,
}
