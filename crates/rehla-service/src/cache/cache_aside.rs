//! Cache-aside accessor shared by every cached entity.

use super::{CacheInterface, CacheKey};
use metrics::counter;
use rehla_core::{Course, Exam, Lecture, Material, RehlaResult};
use rehla_security::Principal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// A value that can live in the cache.
///
/// Identifiers that are not serialized (parent course ids) are put back from
/// the key after a cache hit.
pub trait CacheEntry: Serialize + DeserializeOwned + Send + Sync {
    /// Restores identifiers carried by `key` rather than by the payload.
    fn restore_ids(&mut self, _key: &CacheKey) {}
}

impl CacheEntry for Course {
    fn restore_ids(&mut self, key: &CacheKey) {
        if let (true, Some(course_id)) = (self.id.is_empty(), key.course_id()) {
            self.id = course_id.to_string();
        }
    }
}

impl CacheEntry for Vec<Course> {}

impl CacheEntry for Principal {}

macro_rules! course_child_entry {
    ($ty:ty) => {
        impl CacheEntry for $ty {
            fn restore_ids(&mut self, key: &CacheKey) {
                if let Some(course_id) = key.course_id() {
                    self.course_id = course_id.to_string();
                }
            }
        }

        impl CacheEntry for Vec<$ty> {
            fn restore_ids(&mut self, key: &CacheKey) {
                for item in self.iter_mut() {
                    item.restore_ids(key);
                }
            }
        }
    };
}

course_child_entry!(Lecture);
course_child_entry!(Exam);
course_child_entry!(Material);

/// Read-through, invalidation and refresh over a cache client.
///
/// Cache failures never reach the caller of a read or an invalidation: a
/// miss, an undecodable entry and an unreachable cache all degrade to a
/// store read, and failed deletes are only logged.
#[derive(Clone, Copy)]
pub struct CacheAside<'a> {
    cache: &'a dyn CacheInterface,
}

impl<'a> CacheAside<'a> {
    #[must_use]
    pub fn new(cache: &'a dyn CacheInterface) -> Self {
        Self { cache }
    }

    /// Returns the cached value at `key`, or `None` on miss, decode failure
    /// or cache error.
    pub async fn lookup<T: CacheEntry>(&self, key: &CacheKey) -> Option<T> {
        if !key.is_cacheable() {
            debug!("Bypassing cache for malformed key '{}'", key);
            return None;
        }
        let raw_key = key.as_key();
        let raw = match self.cache.get_raw(&raw_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                counter!("cache_misses_total").increment(1);
                return None;
            }
            Err(e) => {
                warn!("Cache read of '{}' failed, falling back to store: {}", raw_key, e);
                counter!("cache_misses_total").increment(1);
                return None;
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(mut value) => {
                value.restore_ids(key);
                counter!("cache_hits_total").increment(1);
                Some(value)
            }
            Err(e) => {
                warn!("Undecodable cache entry at '{}', falling back to store: {}", raw_key, e);
                counter!("cache_decode_failures_total").increment(1);
                None
            }
        }
    }

    /// Returns the cached value at `key`, loading it from the store and
    /// filling the cache when absent. Only a store error is returned.
    pub async fn read_through<T, F, Fut>(&self, key: &CacheKey, load: F) -> RehlaResult<T>
    where
        T: CacheEntry,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = RehlaResult<T>> + Send,
    {
        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        let value = load().await?;
        self.fill(key, &value, None).await;
        Ok(value)
    }

    /// Writes `value` at `key`, logging failures.
    pub async fn fill<T: CacheEntry>(&self, key: &CacheKey, value: &T, ttl: Option<Duration>) {
        match self.store(key, value, ttl).await {
            Ok(()) => debug!("Filled cache key '{}'", key),
            Err(e) => warn!("Failed to fill cache key '{}': {}", key, e),
        }
    }

    /// Deletes `key` and the aggregate list it belongs to.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.delete_logged(key).await;
        if let Some(parent) = key.parent_list() {
            self.delete_logged(&parent).await;
        }
    }

    /// Overwrites `key` with `value` without expiry.
    ///
    /// On failure the key is deleted so no stale value survives, and the
    /// error is returned.
    pub async fn refresh<T: CacheEntry>(&self, key: &CacheKey, value: &T) -> RehlaResult<()> {
        match self.store(key, value, None).await {
            Ok(()) => {
                debug!("Refreshed cache key '{}'", key);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to refresh cache key '{}': {}", key, e);
                self.delete_logged(key).await;
                Err(e)
            }
        }
    }

    /// Deletes `key` alone, logging failures.
    pub async fn delete_logged(&self, key: &CacheKey) {
        if !key.is_cacheable() {
            return;
        }
        match self.cache.delete(&key.as_key()).await {
            Ok(existed) => debug!("Invalidated cache key '{}' (existed: {})", key, existed),
            Err(e) => {
                warn!("Failed to invalidate cache key '{}': {}", key, e);
                counter!("cache_invalidation_failures_total").increment(1);
            }
        }
    }

    async fn store<T: CacheEntry>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Option<Duration>,
    ) -> RehlaResult<()> {
        if !key.is_cacheable() {
            return Ok(());
        }
        let json = serde_json::to_string(value)?;
        self.cache.set_raw(&key.as_key(), &json, ttl).await
    }
}

impl std::fmt::Debug for CacheAside<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside")
            .field("enabled", &self.cache.is_enabled())
            .finish()
    }
}
