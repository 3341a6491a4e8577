//! # Document Store
//!
//! The persistence boundary. The API only needs a handful of document
//! operations (fetch by id, field-equality query, insert, merge-update,
//! delete), so the store is an abstract trait and the concrete database
//! stays an external collaborator behind it. [`MemoryStore`] is the
//! in-process implementation used by the server binary and the tests.

pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;

/// The field map of a stored document, excluding its id.
pub type DocumentData = Map<String, Value>;

/// A stored document: an opaque, store-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: DocumentData,
}

impl Document {
    /// The document as a single JSON object with the id inlined.
    pub fn into_value(self) -> Value {
        let mut object = Map::new();
        object.insert("id".to_string(), Value::String(self.id));
        object.extend(self.data);
        Value::Object(object)
    }
}

/// Store-level failures. These are infrastructure errors, not domain
/// outcomes; absence is reported through `Option`/`bool` returns instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Abstract document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents, optionally filtered by exact field equality.
    async fn list(&self, filter: Option<(&str, &Value)>) -> StoreResult<Vec<Document>>;

    /// First document whose `field` equals `value`, if any.
    async fn find_by_field(&self, field: &str, value: &Value) -> StoreResult<Option<Document>>;

    /// Fetch a document by id.
    async fn get(&self, id: &str) -> StoreResult<Option<Document>>;

    /// Insert a new document; the store assigns its id.
    async fn insert(&self, data: DocumentData) -> StoreResult<Document>;

    /// Merge `patch` into the document's fields, returning the updated
    /// document, or `None` if no document has that id.
    async fn update(&self, id: &str, patch: DocumentData) -> StoreResult<Option<Document>>;

    /// Delete by id; `false` if no document has that id.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}
