//! `DocumentStore` trait: access to the authoritative document database.
//!
//! This is the lowest data access layer. Repositories in [`crate::traits`]
//! map documents to domain entities on top of it.

use super::path::{CollectionPath, DocumentPath};
use async_trait::async_trait;
use rehla_core::{FieldUpdates, Interface, RehlaResult};
use serde_json::Value;

/// A stored document: a JSON object without its own id.
pub type Document = serde_json::Map<String, Value>;

/// Authoritative hierarchical document store.
#[async_trait]
pub trait DocumentStore: Interface + Send + Sync {
    /// Reads one document.
    async fn get(&self, path: &DocumentPath) -> RehlaResult<Option<Document>>;

    /// Lists the direct documents of a collection as `(id, document)` pairs,
    /// ordered by id.
    async fn list(&self, collection: &CollectionPath) -> RehlaResult<Vec<(String, Document)>>;

    /// Adds a document with a generated id and returns the id.
    async fn create(&self, collection: &CollectionPath, document: Document) -> RehlaResult<String>;

    /// Writes a document, replacing any previous content.
    async fn set(&self, path: &DocumentPath, document: Document) -> RehlaResult<()>;

    /// Applies field writes to an existing document.
    ///
    /// Fails with `NotFound` when the document does not exist.
    async fn update(&self, path: &DocumentPath, updates: &FieldUpdates) -> RehlaResult<()>;

    /// Deletes one document. Sub-collections are left untouched.
    ///
    /// Returns `true` if the document existed.
    async fn delete(&self, path: &DocumentPath) -> RehlaResult<bool>;

    /// Lists the documents of a collection whose `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> RehlaResult<Vec<(String, Document)>>;

    /// Persists buffered state, if the store buffers any. Called on shutdown.
    async fn flush(&self) -> RehlaResult<()> {
        Ok(())
    }
}
