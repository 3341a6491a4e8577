//! # Product Model
//!
//! Field names are the Spanish wire names the API speaks: `nombre`,
//! `precio`, `cantidad`, `disponible`.

use serde::{Deserialize, Serialize};

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque identifier assigned by the store.
    pub id: String,
    /// Unique (for matching purposes) product name.
    pub nombre: String,
    /// Non-negative price.
    pub precio: f64,
    /// Non-negative quantity on hand.
    pub cantidad: f64,
    /// Whether the product is available.
    pub disponible: bool,
}

/// Input for product creation, after validation and normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub nombre: String,
    pub precio: f64,
    pub cantidad: f64,
    #[serde(default = "default_disponible")]
    pub disponible: bool,
}

fn default_disponible() -> bool {
    true
}

/// Partial update input. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disponible: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.precio.is_none()
            && self.cantidad.is_none()
            && self.disponible.is_none()
    }
}
