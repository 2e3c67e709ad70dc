//! Request handling layer

pub mod auth_controller;
pub mod booking_controller;
pub mod broker_controller;
pub mod document_controller;
pub mod reference_controller;
pub mod vehicle_controller;
