//! # Rehla Repository
//!
//! Data access for Rehla:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn CourseRepository>   (domain interface)
//! CourseRepositoryImpl             (maps documents to entities)
//!   ↓  Arc<dyn DocumentStore>      (DAO interface)
//! InMemoryDocumentStore            (DAO impl)
//! ```
//!
//! Alongside the document store live the other external collaborators:
//! object storage for uploaded files and the video host API.

pub mod dao;
pub mod r#impl;
pub mod storage;
pub mod traits;
pub mod video;

pub use dao::{paths, CollectionPath, Document, DocumentPath, DocumentStore, InMemoryDocumentStore};
pub use r#impl::*;
pub use storage::{InMemoryObjectStorage, ObjectStorage, StoredObject};
pub use traits::*;
pub use video::{VideoHost, WistiaVideoHost};
