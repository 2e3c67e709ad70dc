//! Dealer back-office service: booking wizard, price/GST derivation,
//! broker OTP handshake, vehicle stock and printable documents.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
