//! Service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;

use souk_core::RESET_TOKEN_TTL_SECS;

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Path to the SQLite database file
    pub database_path: String,

    /// Base URL embedded in password reset emails; the opaque token is
    /// appended as the final path segment
    pub reset_link_base: String,

    /// Sender address for outgoing reset emails
    pub mail_from: String,

    /// How long a reset token stays redeemable, in seconds
    pub reset_token_ttl_secs: i64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServiceConfig {
            database_path: env::var("SOUK_DB_PATH").unwrap_or_else(|_| "./souk.db".to_string()),

            reset_link_base: env::var("SOUK_RESET_LINK_BASE")
                .unwrap_or_else(|_| "http://localhost:8000/account/reset".to_string()),

            mail_from: env::var("SOUK_MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@souk.example".to_string()),

            reset_token_ttl_secs: env::var("SOUK_RESET_TOKEN_TTL_SECS")
                .unwrap_or_else(|_| RESET_TOKEN_TTL_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SOUK_RESET_TOKEN_TTL_SECS".to_string()))?,
        };

        if config.reset_token_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "SOUK_RESET_TOKEN_TTL_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Builds the full reset link for a token.
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/{}", self.reset_link_base.trim_end_matches('/'), token)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            database_path: "./souk.db".to_string(),
            reset_link_base: "http://localhost:8000/account/reset".to_string(),
            mail_from: "no-reply@souk.example".to_string(),
            reset_token_ttl_secs: RESET_TOKEN_TTL_SECS,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link_building() {
        let config = ServiceConfig {
            reset_link_base: "https://souk.example/account/reset/".to_string(),
            ..ServiceConfig::default()
        };
        assert_eq!(
            config.reset_link("abc123"),
            "https://souk.example/account/reset/abc123"
        );
    }
}
