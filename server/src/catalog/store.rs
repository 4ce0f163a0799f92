//! Document store.
//!
//! The catalog persists schemaless JSON documents grouped by collection.
//! Stores only support the operations the catalog needs: insert, lookup by
//! id, full listing, replace, remove, and single-field filters.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rc_common::Collection;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::CatalogResult;

/// A JSON object document.
pub type Document = Map<String, Value>;

/// Document store backing the catalog.
///
/// Documents returned by reads carry their id in an `"id"` field.
pub trait CatalogStore: Send + Sync {
    /// Insert a document and return its generated id.
    fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = CatalogResult<String>> + Send;

    /// Fetch a document by id.
    fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = CatalogResult<Option<Document>>> + Send;

    /// All documents of a collection, oldest first.
    fn list(
        &self,
        collection: Collection,
    ) -> impl Future<Output = CatalogResult<Vec<Document>>> + Send;

    /// Replace a document. Returns `false` if it does not exist.
    fn replace(
        &self,
        collection: Collection,
        id: &str,
        document: Document,
    ) -> impl Future<Output = CatalogResult<bool>> + Send;

    /// Set the `verified` flag on a document, leaving the rest untouched.
    ///
    /// Returns the updated document, or `None` if it does not exist.
    fn set_verified(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = CatalogResult<Option<Document>>> + Send;

    /// Remove a document. Returns `false` if it does not exist.
    fn remove(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = CatalogResult<bool>> + Send;

    /// Documents whose `field` equals `value`.
    fn find_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> impl Future<Output = CatalogResult<Vec<Document>>> + Send;

    /// Documents whose array `field` contains `value`.
    fn find_contains(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> impl Future<Output = CatalogResult<Vec<Document>>> + Send;
}

#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    body: Document,
}

/// In-process document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<(Collection, String), StoredDocument>,
    next_seq: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    #[must_use]
    pub fn count(&self, collection: Collection) -> usize {
        self.documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .count()
    }

    fn with_id(id: &str, body: &Document) -> Document {
        let mut document = body.clone();
        document.insert("id".to_string(), Value::String(id.to_string()));
        document
    }

    fn scan(&self, collection: Collection, predicate: impl Fn(&Document) -> bool) -> Vec<Document> {
        let mut matches: Vec<(u64, Document)> = self
            .documents
            .iter()
            .filter(|entry| entry.key().0 == collection && predicate(&entry.value().body))
            .map(|entry| (entry.value().seq, Self::with_id(&entry.key().1, &entry.value().body)))
            .collect();
        matches.sort_by_key(|(seq, _)| *seq);
        matches.into_iter().map(|(_, document)| document).collect()
    }
}

fn strip_id(mut document: Document) -> Document {
    document.remove("id");
    document
}

impl CatalogStore for MemoryStore {
    async fn insert(&self, collection: Collection, document: Document) -> CatalogResult<String> {
        let id = Uuid::now_v7().to_string();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.documents.insert(
            (collection, id.clone()),
            StoredDocument {
                seq,
                body: strip_id(document),
            },
        );
        Ok(id)
    }

    async fn get(&self, collection: Collection, id: &str) -> CatalogResult<Option<Document>> {
        Ok(self
            .documents
            .get(&(collection, id.to_string()))
            .map(|entry| Self::with_id(id, &entry.body)))
    }

    async fn list(&self, collection: Collection) -> CatalogResult<Vec<Document>> {
        Ok(self.scan(collection, |_| true))
    }

    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        document: Document,
    ) -> CatalogResult<bool> {
        match self.documents.get_mut(&(collection, id.to_string())) {
            Some(mut entry) => {
                entry.body = strip_id(document);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_verified(
        &self,
        collection: Collection,
        id: &str,
    ) -> CatalogResult<Option<Document>> {
        Ok(self
            .documents
            .get_mut(&(collection, id.to_string()))
            .map(|mut entry| {
                entry.body.insert("verified".to_string(), Value::Bool(true));
                Self::with_id(id, &entry.body)
            }))
    }

    async fn remove(&self, collection: Collection, id: &str) -> CatalogResult<bool> {
        Ok(self.documents.remove(&(collection, id.to_string())).is_some())
    }

    async fn find_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> CatalogResult<Vec<Document>> {
        Ok(self.scan(collection, |doc| doc.get(field) == Some(value)))
    }

    async fn find_contains(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> CatalogResult<Vec<Document>> {
        Ok(self.scan(collection, |doc| {
            doc.get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value))
        }))
    }
}
