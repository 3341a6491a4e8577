//! Raw JSON body extractor.
//!
//! Parse failures become a `BadRequest` rendered through the envelope, so
//! even transport-level errors reach the client in the uniform shape.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde_json::Value;

use crate::core::ApiError;

/// The request body as raw JSON, before validation.
pub struct JsonBody(pub Value);

impl JsonBody {
    pub fn into_inner(self) -> Value {
        self.0
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(vec![rejection.body_text()])),
        }
    }
}
