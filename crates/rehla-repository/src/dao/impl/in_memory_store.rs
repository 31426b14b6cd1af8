//! In-process document store.
//!
//! Documents are kept in an ordered map keyed by their full path, which makes
//! listing a collection a range scan. The store can be seeded from and flushed
//! to a JSON snapshot file mapping paths to documents.

use crate::dao::{CollectionPath, Document, DocumentPath, DocumentStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use rehla_core::{new_document_id, FieldUpdates, RehlaError, RehlaResult};
use serde_json::Value;
use shaku::Component;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Document store held in memory.
#[derive(Component, Default)]
#[shaku(interface = DocumentStore)]
pub struct InMemoryDocumentStore {
    documents: RwLock<BTreeMap<String, Document>>,
    /// Snapshot file written by [`DocumentStore::flush`].
    snapshot_path: Option<PathBuf>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given `(path, document)` pairs.
    #[must_use]
    pub fn with_documents(documents: BTreeMap<String, Document>) -> Self {
        Self {
            documents: RwLock::new(documents),
            snapshot_path: None,
        }
    }

    /// Makes [`DocumentStore::flush`] write a snapshot to `path`.
    #[must_use]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Reads a snapshot file: a JSON object mapping document paths to documents.
    pub async fn load_snapshot(path: impl AsRef<Path>) -> RehlaResult<BTreeMap<String, Document>> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            RehlaError::store(format!("Failed to read snapshot '{}': {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&raw)?;
        let Value::Object(entries) = value else {
            return Err(RehlaError::store("Snapshot root must be a JSON object"));
        };

        let mut documents = BTreeMap::new();
        for (doc_path, doc) in entries {
            let Value::Object(mut doc) = doc else {
                return Err(RehlaError::store(format!(
                    "Snapshot entry '{}' is not an object",
                    doc_path
                )));
            };
            if doc_path.split('/').count() % 2 != 0 {
                return Err(RehlaError::store(format!(
                    "Snapshot entry '{}' is not a document path",
                    doc_path
                )));
            }
            doc.remove("id");
            documents.insert(doc_path, doc);
        }

        info!("Loaded {} documents from {}", documents.len(), path.display());
        Ok(documents)
    }

    /// Writes every document to a snapshot file.
    pub async fn write_snapshot(&self, path: impl AsRef<Path>) -> RehlaResult<()> {
        let path = path.as_ref();
        let snapshot: serde_json::Map<String, Value> = self
            .documents
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), Value::Object(v.clone())))
            .collect();
        let raw = serde_json::to_string_pretty(&Value::Object(snapshot))?;
        tokio::fs::write(path, raw).await.map_err(|e| {
            RehlaError::store(format!("Failed to write snapshot '{}': {}", path.display(), e))
        })?;
        info!("Wrote store snapshot to {}", path.display());
        Ok(())
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true when the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    fn list_locked(
        documents: &BTreeMap<String, Document>,
        collection: &CollectionPath,
    ) -> Vec<(String, Document)> {
        let prefix = format!("{}/", collection.as_str());
        documents
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, doc)| {
                let id = &key[prefix.len()..];
                (!id.contains('/')).then(|| (id.to_string(), doc.clone()))
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> RehlaResult<Option<Document>> {
        Ok(self.documents.read().get(path.as_str()).cloned())
    }

    async fn list(&self, collection: &CollectionPath) -> RehlaResult<Vec<(String, Document)>> {
        let documents = self.documents.read();
        Ok(Self::list_locked(&documents, collection))
    }

    async fn create(&self, collection: &CollectionPath, mut document: Document) -> RehlaResult<String> {
        let id = new_document_id();
        document.remove("id");
        self.documents
            .write()
            .insert(collection.doc(&id).as_str().to_string(), document);
        debug!("Created document {}/{}", collection, id);
        Ok(id)
    }

    async fn set(&self, path: &DocumentPath, mut document: Document) -> RehlaResult<()> {
        document.remove("id");
        self.documents.write().insert(path.as_str().to_string(), document);
        debug!("Set document {}", path);
        Ok(())
    }

    async fn update(&self, path: &DocumentPath, updates: &FieldUpdates) -> RehlaResult<()> {
        let mut documents = self.documents.write();
        let document = documents
            .get_mut(path.as_str())
            .ok_or_else(|| RehlaError::not_found("Document", path))?;
        for update in updates.iter() {
            document.insert(update.path.clone(), update.value.clone());
        }
        debug!("Updated {} fields of {}", updates.len(), path);
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> RehlaResult<bool> {
        let removed = self.documents.write().remove(path.as_str()).is_some();
        debug!("Deleted document {}: {}", path, removed);
        Ok(removed)
    }

    async fn find_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> RehlaResult<Vec<(String, Document)>> {
        let documents = self.documents.read();
        Ok(Self::list_locked(&documents, collection)
            .into_iter()
            .filter(|(_, doc)| doc.get(field) == Some(value))
            .collect())
    }

    async fn flush(&self) -> RehlaResult<()> {
        match &self.snapshot_path {
            Some(path) => self.write_snapshot(path).await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("documents", &self.len())
            .finish()
    }
}
