//! Application Configuration
//!
//! All configuration comes from the environment and is validated once at
//! startup. A missing signing secret is fatal: the server refuses to start
//! rather than issue tokens it cannot verify later.

use std::env;

use chrono::Duration;
use thiserror::Error;

/// Default listening port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 1;

/// Configuration errors reported at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not defined in the environment variables. The server cannot issue credentials without it.")]
    MissingJwtSecret,

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// The single identity allowed to log in. Injected configuration rather
/// than a hardcoded constant, so tests can substitute their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub id: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminIdentity {
    fn default() -> Self {
        Self {
            id: "1".to_string(),
            email: "admin@admin.com".to_string(),
            password: "password123".to_string(),
        }
    }
}

/// Validated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening port.
    pub port: u16,
    /// HMAC secret for token signing.
    pub jwt_secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
    /// The configured login identity.
    pub admin: AdminIdentity,
}

impl AppConfig {
    /// Read and validate configuration from the environment.
    ///
    /// `JWT_SECRET` is required. `PORT` defaults to [`DEFAULT_PORT`];
    /// `ADMIN_EMAIL` and `ADMIN_PASSWORD` override the default identity.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingJwtSecret)?;

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                field: "PORT",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let mut admin = AdminIdentity::default();
        if let Ok(email) = env::var("ADMIN_EMAIL") {
            admin.email = email;
        }
        if let Ok(password) = env::var("ADMIN_PASSWORD") {
            admin.password = password;
        }

        Ok(Self {
            port,
            jwt_secret,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            admin,
        })
    }
}
