//! Shared utilities

pub mod debounce;
pub mod errors;
pub mod jwt;
pub mod validation;
