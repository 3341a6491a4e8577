//! # Product Service
//!
//! Business rules over the document store. The service translates store
//! absence into typed `NotFound` failures; everything else propagates to
//! the central translator untouched.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::core::{ApiError, ApiResult};
use crate::store::{Document, DocumentData, DocumentStore};

use super::{NewProduct, Product, ProductPatch};

/// Product domain operations.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn DocumentStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All products.
    pub async fn list(&self) -> ApiResult<Vec<Product>> {
        self.query(None).await
    }

    /// Products with `disponible == false`.
    pub async fn unavailable(&self) -> ApiResult<Vec<Product>> {
        self.query(Some(false)).await
    }

    async fn query(&self, disponible: Option<bool>) -> ApiResult<Vec<Product>> {
        let value = disponible.map(Value::Bool);
        let filter = value.as_ref().map(|v| ("disponible", v));
        let documents = self.store.list(filter).await?;
        documents.into_iter().map(to_product).collect()
    }

    /// Create a product, merging on duplicate name: if a product with the
    /// same `nombre` already exists, its quantity grows by the new
    /// quantity and the merged record is returned; no second record is
    /// inserted.
    ///
    /// The lookup and the write are separate store calls with no
    /// uniqueness constraint between them, so two concurrent creates for
    /// the same new name can both observe the miss and both insert. This
    /// is an accepted, documented limitation.
    pub async fn create(&self, new: NewProduct) -> ApiResult<Product> {
        let name = Value::String(new.nombre.clone());
        match self.store.find_by_field("nombre", &name).await? {
            Some(existing) => {
                let current = to_product(existing)?;
                let merged = current.cantidad + new.cantidad;
                let mut patch = Map::new();
                patch.insert("cantidad".to_string(), json!(merged));
                let updated = self
                    .store
                    .update(&current.id, patch)
                    .await?
                    .ok_or_else(|| not_found_for_update(&current.id))?;
                tracing::debug!(id = %updated.id, cantidad = merged, "merged duplicate-name create");
                to_product(updated)
            }
            None => {
                let data = to_document_data(&new)?;
                let document = self.store.insert(data).await?;
                tracing::debug!(id = %document.id, "inserted product");
                to_product(document)
            }
        }
    }

    /// Fetch a product by id.
    pub async fn get_by_id(&self, id: &str) -> ApiResult<Product> {
        let document = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Producto con id {id} no encontrado.")))?;
        to_product(document)
    }

    /// Apply a partial update, returning the full merged record.
    pub async fn update_by_id(&self, id: &str, patch: ProductPatch) -> ApiResult<Product> {
        let data = to_patch_data(&patch)?;
        let document = self
            .store
            .update(id, data)
            .await?
            .ok_or_else(|| not_found_for_update(id))?;
        to_product(document)
    }

    /// Delete a product by id.
    pub async fn delete_by_id(&self, id: &str) -> ApiResult<()> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found(format!(
                "Producto con id {id} no encontrado para eliminar."
            )))
        }
    }
}

fn not_found_for_update(id: &str) -> ApiError {
    ApiError::not_found(format!("Producto con id {id} no encontrado para actualizar."))
}

fn to_product(document: Document) -> ApiResult<Product> {
    Ok(serde_json::from_value(document.into_value())?)
}

fn to_document_data(new: &NewProduct) -> ApiResult<DocumentData> {
    match serde_json::to_value(new)? {
        Value::Object(data) => Ok(data),
        _ => Err(ApiError::internal("product did not serialize to an object")),
    }
}

fn to_patch_data(patch: &ProductPatch) -> ApiResult<DocumentData> {
    match serde_json::to_value(patch)? {
        Value::Object(data) => Ok(data),
        _ => Err(ApiError::internal("patch did not serialize to an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (ProductService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ProductService::new(store.clone()), store)
    }

    fn teclado(cantidad: f64) -> NewProduct {
        NewProduct {
            nombre: "Teclado".to_string(),
            precio: 99.5,
            cantidad,
            disponible: true,
        }
    }

    #[tokio::test]
    async fn create_inserts_and_assigns_an_id() {
        let (service, store) = service();
        let created = service.create(teclado(2.0)).await.unwrap();
        assert_eq!(created.id, "1");
        assert_eq!(created.nombre, "Teclado");
        assert_eq!(created.cantidad, 2.0);
        assert!(created.disponible);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_name_create_merges_quantities() {
        let (service, store) = service();
        let first = service.create(teclado(2.0)).await.unwrap();
        let merged = service.create(teclado(3.0)).await.unwrap();

        // never grows the record count, only that record's quantity
        assert_eq!(store.len().await, 1);
        assert_eq!(merged.id, first.id);
        assert_eq!(merged.cantidad, 5.0);
        assert_eq!(merged.nombre, "Teclado");

        let fetched = service.get_by_id(&first.id).await.unwrap();
        assert_eq!(fetched.cantidad, 5.0);
    }

    #[tokio::test]
    async fn distinct_names_insert_distinct_records() {
        let (service, store) = service();
        service.create(teclado(1.0)).await.unwrap();
        let mut raton = teclado(1.0);
        raton.nombre = "Ratón".to_string();
        service.create(raton).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn get_by_id_is_idempotent() {
        let (service, _) = service();
        let created = service.create(teclado(2.0)).await.unwrap();
        let first = service.get_by_id(&created.id).await.unwrap();
        let second = service.get_by_id(&created.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_ids_translate_to_not_found_with_distinct_messages() {
        let (service, _) = service();

        let err = service.get_by_id("9").await.unwrap_err();
        assert_eq!(err, ApiError::not_found("Producto con id 9 no encontrado."));

        let err = service
            .update_by_id("9", ProductPatch::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::not_found("Producto con id 9 no encontrado para actualizar.")
        );

        let err = service.delete_by_id("9").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::not_found("Producto con id 9 no encontrado para eliminar.")
        );
    }

    #[tokio::test]
    async fn update_merges_only_present_fields() {
        let (service, _) = service();
        let created = service.create(teclado(2.0)).await.unwrap();

        let updated = service
            .update_by_id(
                &created.id,
                ProductPatch {
                    cantidad: Some(7.0),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.cantidad, 7.0);
        assert_eq!(updated.nombre, "Teclado");
        assert_eq!(updated.precio, 99.5);
    }

    #[tokio::test]
    async fn unavailable_filters_by_availability() {
        let (service, _) = service();
        service.create(teclado(1.0)).await.unwrap();
        let mut agotado = teclado(1.0);
        agotado.nombre = "Agotado".to_string();
        agotado.disponible = false;
        service.create(agotado).await.unwrap();

        let unavailable = service.unavailable().await.unwrap();
        assert_eq!(unavailable.len(), 1);
        assert_eq!(unavailable[0].nombre, "Agotado");

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let (service, store) = service();
        let created = service.create(teclado(1.0)).await.unwrap();
        service.delete_by_id(&created.id).await.unwrap();
        assert!(store.is_empty().await);
    }
}
