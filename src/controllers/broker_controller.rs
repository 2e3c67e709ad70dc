use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::broker_dto::{OtpStatusResponse, SendOtpResponse, VerifyOtpRequest};
use crate::models::reference::Broker;
use crate::repositories::reference_repository::ReferenceRepository;
use crate::services::otp::{OtpStatus, OtpStore};
use crate::utils::errors::{not_found_error, AppError};

pub struct BrokerController {
    repository: ReferenceRepository,
}

impl BrokerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReferenceRepository::new(pool),
        }
    }

    pub async fn list_by_branch(&self, branch_id: Uuid) -> Result<Vec<Broker>, AppError> {
        self.repository.find_brokers_by_branch(branch_id).await
    }

    /// Generate and dispatch an OTP to the broker's mobile. The code is
    /// never returned to the caller.
    pub async fn send_otp(
        &self,
        user_id: Uuid,
        broker_id: Uuid,
        otp_store: &OtpStore,
        ttl_seconds: i64,
    ) -> Result<SendOtpResponse, AppError> {
        let broker = self
            .repository
            .find_broker(broker_id)
            .await?
            .ok_or_else(|| not_found_error("Broker", &broker_id.to_string()))?;

        if !broker.otp_required {
            return Err(AppError::BadRequest(
                "This broker does not require OTP verification".to_string(),
            ));
        }

        let code = otp_store.send(user_id, broker_id).await;
        // SMS dispatch: the gateway integration consumes the code here; in
        // development the code is logged instead.
        log::debug!("📲 OTP {} for broker {} ({})", code, broker.name, broker.mobile);

        Ok(SendOtpResponse {
            broker_id,
            status: OtpStatus::Sent,
            expires_in_seconds: ttl_seconds,
        })
    }

    pub async fn verify_otp(
        &self,
        user_id: Uuid,
        request: VerifyOtpRequest,
        otp_store: &OtpStore,
    ) -> Result<OtpStatusResponse, AppError> {
        otp_store
            .verify(user_id, request.broker_id, request.otp.trim())
            .await?;

        Ok(OtpStatusResponse {
            broker_id: request.broker_id,
            status: OtpStatus::Verified,
        })
    }

    pub async fn otp_status(
        &self,
        user_id: Uuid,
        broker_id: Uuid,
        otp_store: &OtpStore,
    ) -> Result<OtpStatusResponse, AppError> {
        let broker = self
            .repository
            .find_broker(broker_id)
            .await?
            .ok_or_else(|| not_found_error("Broker", &broker_id.to_string()))?;

        let status = if broker.otp_required {
            otp_store.status(user_id, broker_id).await
        } else {
            OtpStatus::NotRequired
        };

        Ok(OtpStatusResponse { broker_id, status })
    }
}
