//! Broker OTP sub-flow
//!
//! Three-state handshake (`Unsent -> Sent -> Verified`) gating booking
//! submission when the selected exchange broker requires OTP confirmation.
//! State is held in memory per (user, broker); codes are short-lived and
//! swept periodically.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Where the handshake currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpStatus {
    /// Broker does not require OTP confirmation
    NotRequired,
    Unsent,
    Sent,
    Verified,
}

#[derive(Debug, Clone)]
struct OtpEntry {
    code: String,
    expires_at: DateTime<Utc>,
    verified: bool,
}

impl OtpEntry {
    fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// In-memory OTP store keyed by (user, broker)
#[derive(Clone)]
pub struct OtpStore {
    entries: Arc<RwLock<HashMap<(Uuid, Uuid), OtpEntry>>>,
    ttl: Duration,
}

impl OtpStore {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Generate and store a fresh 6-digit code, entering the `Sent` state.
    /// Re-sending replaces the previous code and clears any verification.
    pub async fn send(&self, user_id: Uuid, broker_id: Uuid) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..=999_999u32));
        let entry = OtpEntry {
            code: code.clone(),
            expires_at: Utc::now() + self.ttl,
            verified: false,
        };

        let mut entries = self.entries.write().await;
        entries.insert((user_id, broker_id), entry);
        log::info!("📲 OTP generated for broker {} (user {})", broker_id, user_id);

        code
    }

    /// Check the entered code; on match the state becomes `Verified`.
    /// Failure leaves the state unchanged.
    pub async fn verify(&self, user_id: Uuid, broker_id: Uuid, code: &str) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(&(user_id, broker_id))
            .ok_or_else(|| AppError::BadRequest("OTP has not been sent for this broker".to_string()))?;

        if entry.is_expired() {
            return Err(AppError::BadRequest("OTP has expired, request a new one".to_string()));
        }

        if entry.code != code {
            return Err(AppError::BadRequest("Incorrect OTP".to_string()));
        }

        entry.verified = true;
        log::info!("✅ OTP verified for broker {} (user {})", broker_id, user_id);
        Ok(())
    }

    /// Current handshake state. An expired unverified code counts as
    /// `Unsent`; verification, once reached, survives code expiry.
    pub async fn status(&self, user_id: Uuid, broker_id: Uuid) -> OtpStatus {
        let entries = self.entries.read().await;
        match entries.get(&(user_id, broker_id)) {
            Some(entry) if entry.verified => OtpStatus::Verified,
            Some(entry) if !entry.is_expired() => OtpStatus::Sent,
            _ => OtpStatus::Unsent,
        }
    }

    /// Discard the handshake, e.g. when the wizard selects another broker
    pub async fn reset(&self, user_id: Uuid, broker_id: Uuid) {
        let mut entries = self.entries.write().await;
        entries.remove(&(user_id, broker_id));
    }

    /// Drop expired, unverified codes
    pub async fn cleanup_expired(&self) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.verified || !entry.is_expired());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_then_verify() {
        let store = OtpStore::new(300);
        let user = Uuid::new_v4();
        let broker = Uuid::new_v4();

        assert_eq!(store.status(user, broker).await, OtpStatus::Unsent);

        let code = store.send(user, broker).await;
        assert_eq!(code.len(), 6);
        assert_eq!(store.status(user, broker).await, OtpStatus::Sent);

        assert!(store.verify(user, broker, "000000x").await.is_err());
        assert_eq!(store.status(user, broker).await, OtpStatus::Sent);

        store.verify(user, broker, &code).await.unwrap();
        assert_eq!(store.status(user, broker).await, OtpStatus::Verified);
    }

    #[tokio::test]
    async fn test_verify_without_send_fails() {
        let store = OtpStore::new(300);
        let result = store.verify(Uuid::new_v4(), Uuid::new_v4(), "123456").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_resend_replaces_code() {
        let store = OtpStore::new(300);
        let user = Uuid::new_v4();
        let broker = Uuid::new_v4();

        let first = store.send(user, broker).await;
        let second = store.send(user, broker).await;

        if first != second {
            assert!(store.verify(user, broker, &first).await.is_err());
        }
        store.verify(user, broker, &second).await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_discards_state() {
        let store = OtpStore::new(300);
        let user = Uuid::new_v4();
        let broker = Uuid::new_v4();

        let code = store.send(user, broker).await;
        store.verify(user, broker, &code).await.unwrap();
        store.reset(user, broker).await;
        assert_eq!(store.status(user, broker).await, OtpStatus::Unsent);
    }

    #[tokio::test]
    async fn test_expired_code_counts_as_unsent() {
        let store = OtpStore::new(-1);
        let user = Uuid::new_v4();
        let broker = Uuid::new_v4();

        let code = store.send(user, broker).await;
        assert_eq!(store.status(user, broker).await, OtpStatus::Unsent);
        assert!(store.verify(user, broker, &code).await.is_err());

        store.cleanup_expired().await;
        assert_eq!(store.status(user, broker).await, OtpStatus::Unsent);
    }
}
