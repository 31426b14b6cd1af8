//! Object storage for uploaded files (exam sheets, materials, images).

mod in_memory;

pub use in_memory::{InMemoryObjectStorage, InMemoryObjectStorageParameters, DEFAULT_URL_TTL};

use async_trait::async_trait;
use rehla_core::{Interface, RehlaResult};
use std::time::Duration;

/// A stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object storage abstraction.
#[async_trait]
pub trait ObjectStorage: Interface + Send + Sync {
    /// Uploads a file, replacing any object at `path`.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> RehlaResult<()>;

    /// Reads a file.
    async fn download(&self, path: &str) -> RehlaResult<Option<StoredObject>>;

    /// Returns a time-limited download URL for `path`.
    async fn signed_url(&self, path: &str, ttl: Duration) -> RehlaResult<String>;

    /// Deletes a file. Returns `true` if it existed.
    async fn delete(&self, path: &str) -> RehlaResult<bool>;

    /// Lists the paths starting with `prefix`.
    async fn list(&self, prefix: &str) -> RehlaResult<Vec<String>>;

    /// Returns the permanent public URL of `path` (images).
    fn public_url(&self, path: &str) -> String;

    /// Lifetime of the download URLs handed to browsers.
    fn url_ttl(&self) -> Duration;

    /// Returns a download URL for `path` valid for [`ObjectStorage::url_ttl`].
    async fn download_url(&self, path: &str) -> RehlaResult<String> {
        self.signed_url(path, self.url_ttl()).await
    }
}
