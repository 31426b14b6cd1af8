//! In-process object storage.

use super::{ObjectStorage, StoredObject};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rehla_core::{RehlaError, RehlaResult};
use shaku::Component;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Object storage held in memory. URLs point at `{base_url}/{bucket}/{path}`.
#[derive(Component)]
#[shaku(interface = ObjectStorage)]
pub struct InMemoryObjectStorage {
    objects: RwLock<BTreeMap<String, StoredObject>>,
    base_url: String,
    bucket: String,
    #[shaku(default = DEFAULT_URL_TTL)]
    url_ttl: Duration,
}

/// Lifetime of download URLs unless configured otherwise.
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(15 * 60);

impl InMemoryObjectStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            url_ttl: DEFAULT_URL_TTL,
        }
    }

    /// Sets the lifetime of download URLs.
    #[must_use]
    pub fn with_url_ttl(mut self, url_ttl: Duration) -> Self {
        self.url_ttl = url_ttl;
        self
    }

    /// Returns true when an object exists at `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.objects.read().contains_key(path)
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new("http://localhost", "rehla")
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> RehlaResult<()> {
        if path.is_empty() || path.ends_with('/') {
            return Err(RehlaError::Storage(format!("Invalid object path '{}'", path)));
        }
        debug!("Uploading {} bytes to {}", bytes.len(), path);
        self.objects.write().insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn download(&self, path: &str) -> RehlaResult<Option<StoredObject>> {
        Ok(self.objects.read().get(path).cloned())
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> RehlaResult<String> {
        if !self.contains(path) {
            return Err(RehlaError::Storage(format!("No object at '{}'", path)));
        }
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| RehlaError::Storage(format!("Invalid URL lifetime: {}", e)))?;
        let expires = (Utc::now() + ttl).timestamp();
        Ok(format!(
            "{}/{}/{}?expires={}",
            self.base_url, self.bucket, path, expires
        ))
    }

    async fn delete(&self, path: &str) -> RehlaResult<bool> {
        let removed = self.objects.write().remove(path).is_some();
        debug!("Deleted object {}: {}", path, removed);
        Ok(removed)
    }

    async fn list(&self, prefix: &str) -> RehlaResult<Vec<String>> {
        Ok(self
            .objects
            .read()
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, path)
    }

    fn url_ttl(&self) -> Duration {
        self.url_ttl
    }
}
