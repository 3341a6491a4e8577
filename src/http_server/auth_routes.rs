//! # Auth Routes
//!
//! Login against the single configured identity.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use crate::core::{envelope, ApiError};
use crate::pipeline::RequestContext;

use super::{authorization_header, AppState, JsonBody};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/login", post(login))
}

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: JsonBody,
) -> Result<Response, ApiError> {
    let mut ctx = RequestContext::new()
        .with_authorization(authorization_header(&headers))
        .with_body(body.into_inner());
    state.pipelines.login.run(&mut ctx)?;
    let credentials: Credentials = ctx.validated()?;

    let admin = &state.config.admin;
    if credentials.email != admin.email || credentials.password != admin.password {
        tracing::warn!(email = %credentials.email, "rejected login attempt");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state.jwt.issue(&admin.id, &admin.email)?;
    Ok(envelope::success(
        json!({ "token": token }),
        StatusCode::OK,
        "Login successful",
    ))
}
