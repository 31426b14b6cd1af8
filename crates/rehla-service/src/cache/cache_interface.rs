//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use rehla_core::RehlaResult;
use shaku::Interface;
use std::time::Duration;

/// Cache interface for storing and retrieving cached data.
///
/// Values are JSON strings so the trait stays object safe.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> RehlaResult<Option<String>>;

    /// Set a raw JSON value. `None` means the entry never expires.
    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> RehlaResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> RehlaResult<bool>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}
