//! Service configuration

pub mod environment;
