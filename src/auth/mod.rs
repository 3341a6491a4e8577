//! Authentication
//!
//! Token issue/verify and the request-scoped principal decoded from a
//! verified credential.

pub mod jwt;

pub use jwt::{Claims, JwtManager, Principal};
