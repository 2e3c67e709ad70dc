use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::otp::OtpStatus;

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub broker_id: Uuid,
}

// Response to a send-OTP request. The code itself goes out via SMS and is
// never echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub broker_id: Uuid,
    pub status: OtpStatus,
    pub expires_in_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub broker_id: Uuid,
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct OtpStatusResponse {
    pub broker_id: Uuid,
    pub status: OtpStatus,
}
