//! # Credential Gate
//!
//! Verifies the bearer credential before the request reaches business
//! logic. One verification call, no retries; the only context mutation is
//! attaching the decoded principal.

use std::sync::Arc;

use crate::auth::JwtManager;
use crate::core::{ApiError, ApiResult};

use super::{Gate, RequestContext};

/// Rejection when the header is absent or not `Bearer `-prefixed.
pub const NO_TOKEN_MESSAGE: &str = "No token provided or token is malformed.";

/// Rejection when verification of the token itself fails.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token.";

/// Gate that authenticates the request's bearer token.
pub struct AuthenticateGate {
    jwt: Arc<JwtManager>,
}

impl AuthenticateGate {
    pub fn new(jwt: Arc<JwtManager>) -> Self {
        Self { jwt }
    }
}

impl Gate for AuthenticateGate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    fn apply(&self, ctx: &mut RequestContext) -> ApiResult<()> {
        let header = ctx
            .authorization()
            .ok_or_else(|| ApiError::unauthorized(NO_TOKEN_MESSAGE))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized(NO_TOKEN_MESSAGE))?;

        let principal = self.jwt.verify(token).map_err(|err| {
            tracing::debug!(error = %err, "token verification failed");
            ApiError::unauthorized(INVALID_TOKEN_MESSAGE)
        })?;

        ctx.set_principal(principal);
        Ok(())
    }
}
