pub mod auth_routes;
pub mod booking_routes;
pub mod broker_routes;
pub mod document_routes;
pub mod reference_routes;
pub mod vehicle_routes;
