//! # Product Routes
//!
//! CRUD over the product resource. The per-endpoint gate chains are
//! declared in [`super::Pipelines`]; each handler runs its chain, then
//! calls the service.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::core::{envelope, ApiError};
use crate::pipeline::RequestContext;
use crate::products::{NewProduct, ProductPatch};

use super::{authorization_header, AppState, JsonBody};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/unavailable", get(unavailable_products))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn list_products(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let products = state.products.list().await?;
    Ok(envelope::success(
        products,
        StatusCode::OK,
        envelope::DEFAULT_SUCCESS_MESSAGE,
    ))
}

async fn unavailable_products(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let products = state.products.unavailable().await?;
    Ok(envelope::success(
        products,
        StatusCode::OK,
        envelope::DEFAULT_SUCCESS_MESSAGE,
    ))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: JsonBody,
) -> Result<Response, ApiError> {
    let mut ctx = RequestContext::new()
        .with_authorization(authorization_header(&headers))
        .with_body(body.into_inner());
    state.pipelines.create_product.run(&mut ctx)?;
    let input: NewProduct = ctx.validated()?;

    let created = state.products.create(input).await?;
    Ok(envelope::success(
        created,
        StatusCode::CREATED,
        envelope::DEFAULT_SUCCESS_MESSAGE,
    ))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let mut ctx = RequestContext::new().with_param("id", id.clone());
    state.pipelines.get_product.run(&mut ctx)?;

    let product = state.products.get_by_id(&id).await?;
    Ok(envelope::success(
        product,
        StatusCode::OK,
        envelope::DEFAULT_SUCCESS_MESSAGE,
    ))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: JsonBody,
) -> Result<Response, ApiError> {
    let mut ctx = RequestContext::new()
        .with_authorization(authorization_header(&headers))
        .with_param("id", id.clone())
        .with_body(body.into_inner());
    state.pipelines.update_product.run(&mut ctx)?;

    let mut data = ctx.take_data();
    data.remove("id");
    let patch: ProductPatch = serde_json::from_value(Value::Object(data))?;

    let updated = state.products.update_by_id(&id, patch).await?;
    Ok(envelope::success(
        updated,
        StatusCode::OK,
        envelope::DEFAULT_SUCCESS_MESSAGE,
    ))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let mut ctx = RequestContext::new()
        .with_authorization(authorization_header(&headers))
        .with_param("id", id.clone());
    state.pipelines.delete_product.run(&mut ctx)?;

    state.products.delete_by_id(&id).await?;
    Ok(envelope::success(
        json!({ "id": id }),
        StatusCode::OK,
        envelope::DEFAULT_SUCCESS_MESSAGE,
    ))
}
