//! Core Response Types
//!
//! The typed failure taxonomy and the uniform wire envelope. Everything
//! the API sends to a client passes through one of these two modules.

pub mod envelope;
pub mod error;

pub use error::{ApiError, ApiResult};
