//! DAO (Data Access Object) layer.
//!
//! The document store is the single authoritative data source. Repositories
//! sit on top of it and translate documents into domain entities.
//!
//! Hierarchy:
//! ```text
//! Service → Repository (interface + impl) → DocumentStore (interface + impl)
//! ```

pub mod document_store;
pub mod path;
pub mod r#impl;

pub use document_store::{Document, DocumentStore};
pub use path::{paths, CollectionPath, DocumentPath};
pub use r#impl::InMemoryDocumentStore;
