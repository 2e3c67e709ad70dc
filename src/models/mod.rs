//! Data models
//!
//! Records exchanged with PostgreSQL. Nested booking sub-records are stored
//! as JSONB columns via `sqlx::types::Json`.

pub mod booking;
pub mod reference;
pub mod user;
pub mod vehicle;
