//! Data access layer

pub mod booking_repository;
pub mod reference_repository;
pub mod user_repository;
pub mod vehicle_repository;
