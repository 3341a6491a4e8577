//! almacen - a small product inventory REST API
//!
//! Requests flow through an explicit, per-route pipeline of gates
//! (validation, authentication) into the product domain service; every
//! failure anywhere in the chain is a typed [`core::ApiError`] rendered
//! through the uniform response envelope at a single boundary.

pub mod auth;
pub mod config;
pub mod core;
pub mod http_server;
pub mod pipeline;
pub mod products;
pub mod store;
