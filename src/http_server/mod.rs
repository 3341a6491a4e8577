//! # HTTP Server
//!
//! Route tables, shared state, and the per-endpoint gate pipelines. Every
//! handler follows the same shape: build a request context from the raw
//! inputs, run the endpoint's pipeline, call the domain service, render
//! through the envelope. Failures anywhere in that chain are `ApiError`s
//! handled by the central translator.

pub mod auth_routes;
mod extract;
pub mod product_routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::JwtManager;
use crate::config::AppConfig;
use crate::core::ApiError;
use crate::pipeline::{AuthenticateGate, Pipeline, RuleSet, ValidateGate};
use crate::products::ProductService;
use crate::store::DocumentStore;

pub use extract::JsonBody;

/// The ordered gate chain of every gated endpoint, declared in one place.
pub struct Pipelines {
    pub login: Pipeline,
    pub create_product: Pipeline,
    pub update_product: Pipeline,
    pub get_product: Pipeline,
    pub delete_product: Pipeline,
}

impl Pipelines {
    fn new(jwt: &Arc<JwtManager>) -> Self {
        Self {
            login: Pipeline::new().gate(ValidateGate::new(RuleSet::login())),
            create_product: Pipeline::new()
                .gate(AuthenticateGate::new(jwt.clone()))
                .gate(ValidateGate::new(RuleSet::create_product())),
            update_product: Pipeline::new()
                .gate(AuthenticateGate::new(jwt.clone()))
                .gate(ValidateGate::new(RuleSet::update_product())),
            get_product: Pipeline::new().gate(ValidateGate::new(RuleSet::product_id())),
            delete_product: Pipeline::new()
                .gate(AuthenticateGate::new(jwt.clone()))
                .gate(ValidateGate::new(RuleSet::product_id())),
        }
    }
}

/// Shared application state. Opened once at startup, shared read-only by
/// every in-flight request.
pub struct AppState {
    pub config: AppConfig,
    pub jwt: Arc<JwtManager>,
    pub products: ProductService,
    pub pipelines: Pipelines,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let jwt = Arc::new(JwtManager::new(&config.jwt_secret, config.token_ttl));
        let pipelines = Pipelines::new(&jwt);
        Self {
            config,
            jwt,
            products: ProductService::new(store),
            pipelines,
        }
    }
}

/// Build the application router. All API routes live under `/api/v1`;
/// anything unmatched falls through to the central 404.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(auth_routes::routes())
        .merge(product_routes::routes());

    Router::new()
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("The requested URL was not found on this server.")
}

/// Raw `Authorization` header value, if it is valid UTF-8.
pub(crate) fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

/// The HTTP server: state plus a listening loop.
pub struct HttpServer {
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            state: Arc::new(AppState::new(config, store)),
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind and serve until the process exits.
    pub async fn start(&self) -> std::io::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "listening");
        axum::serve(listener, self.router()).await
    }
}
