//! # In-Memory Store
//!
//! Keeps documents in insertion order behind an async `RwLock`. Ids are
//! monotonically increasing integers rendered as strings, so routes with a
//! numeric id policy work against store-assigned ids.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Document, DocumentData, DocumentStore, StoreResult};

/// In-process document store.
#[derive(Debug)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, filter: Option<(&str, &serde_json::Value)>) -> StoreResult<Vec<Document>> {
        let documents = self.documents.read().await;
        let matched = documents
            .iter()
            .filter(|doc| match filter {
                Some((field, value)) => doc.data.get(field) == Some(value),
                None => true,
            })
            .cloned()
            .collect();
        Ok(matched)
    }

    async fn find_by_field(
        &self,
        field: &str,
        value: &serde_json::Value,
    ) -> StoreResult<Option<Document>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|doc| doc.data.get(field) == Some(value))
            .cloned())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Document>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|doc| doc.id == id).cloned())
    }

    async fn insert(&self, data: DocumentData) -> StoreResult<Document> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let document = Document { id, data };
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn update(&self, id: &str, patch: DocumentData) -> StoreResult<Option<Document>> {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => {
                doc.data.extend(patch);
                Ok(Some(doc.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|doc| doc.id != id);
        Ok(documents.len() < before)
    }
}
