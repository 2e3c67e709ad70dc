//! Shared application state
//!
//! State handed to every axum handler: the connection pool, the environment
//! configuration, the in-memory broker OTP store and the debouncer backing
//! the lookup-as-you-type endpoints.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::otp::OtpStore;
use crate::utils::debounce::Debouncer;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub otp_store: OtpStore,
    pub search_debouncer: Debouncer,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let otp_store = OtpStore::new(config.otp_ttl_seconds);
        Self {
            pool,
            config,
            otp_store,
            search_debouncer: Debouncer::default(),
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(&self.config)
    }
}
