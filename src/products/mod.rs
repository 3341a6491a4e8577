//! Product Domain
//!
//! The product model and the business rules over the document store.

pub mod model;
pub mod service;

pub use model::{NewProduct, Product, ProductPatch};
pub use service::ProductService;
