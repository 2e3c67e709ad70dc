//! Business services
//!
//! The pure core of the back office: wizard guards, price derivation,
//! broker OTP handshake and document rendering. Controllers orchestrate
//! these over the repositories.

pub mod documents;
pub mod otp;
pub mod pricing;
pub mod wizard;
