//! # Error Taxonomy
//!
//! A closed set of failure kinds, each carrying an HTTP status code. Gates
//! and the domain service never catch and suppress; failures propagate
//! untouched to the single translation boundary, the [`IntoResponse`] impl
//! at the bottom of this module.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::envelope::{self, ErrorPayload};

/// Result type used throughout the request pipeline.
pub type ApiResult<T> = Result<T, ApiError>;

/// A typed failure. Every error raised anywhere in the pipeline is one of
/// these, so the translator can pick a status code without inspecting
/// message text.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Validation failed. Carries the ordered list of every violated rule's
    /// message, collected in a single pass.
    BadRequest(Vec<String>),

    /// Missing, malformed, or invalid credential.
    Unauthorized(String),

    /// Authenticated but not allowed. Declared for completeness; no route
    /// raises it today.
    Forbidden(String),

    /// The addressed resource does not exist.
    NotFound(String),

    /// Catch-all for unexpected failures. The raw message is surfaced to
    /// the client; hardening that leak is a known follow-up.
    Internal(String),
}

impl ApiError {
    pub fn bad_request(details: Vec<String>) -> Self {
        Self::BadRequest(details)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status code, fixed per kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human message for the envelope's top-level `message` field.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(_) => "Bad Request",
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Internal(message) => message,
        }
    }

    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(details) => {
                write!(f, "Bad Request: {}", details.join(", "))
            }
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// The centralized failure-to-response translator. BadRequest renders its
/// detail list (index-keyed on the wire); every other kind renders its
/// message string.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::BadRequest(details) => {
                envelope::error(ErrorPayload::Messages(details), status, "Bad Request")
            }
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Internal(message) => {
                envelope::error(ErrorPayload::Message(message.clone()), status, &message)
            }
        }
    }
}
