//! Environment configuration
//!
//! Reads the service configuration from environment variables.

use std::env;

/// Service configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    /// Validity window for broker exchange OTP codes, in seconds
    pub otp_ttl_seconds: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
            otp_ttl_seconds: env::var("OTP_TTL_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("OTP_TTL_SECONDS must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Check whether we are running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Check whether we are running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Server bind address
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
