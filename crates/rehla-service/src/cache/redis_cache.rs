//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use rehla_core::{RehlaError, RehlaResult};
use shaku::Component;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Upper bound on a single cache round trip unless configured otherwise.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_millis(500);

/// Redis-based cache service.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    /// Redis connection pool. `None` disables the cache.
    pool: Option<Arc<Pool>>,
    /// Budget for one cache operation, pool checkout included.
    #[shaku(default = DEFAULT_OP_TIMEOUT)]
    op_timeout: Duration,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self::with_timeout(pool, DEFAULT_OP_TIMEOUT)
    }

    /// Create a cache service with a custom operation timeout.
    #[must_use]
    pub fn with_timeout(pool: Arc<Pool>, op_timeout: Duration) -> Self {
        Self {
            pool: Some(pool),
            op_timeout,
        }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Runs `op` against a pooled connection within the operation timeout.
    async fn run<T, F, Fut>(&self, key: &str, op: F) -> RehlaResult<T>
    where
        F: FnOnce(deadpool_redis::Connection) -> Fut,
        Fut: Future<Output = RehlaResult<T>>,
    {
        let Some(pool) = &self.pool else {
            return Err(RehlaError::Cache("Cache is disabled".to_string()));
        };

        let work = async {
            let conn = pool.get().await.map_err(|e| {
                RehlaError::Cache(format!("Failed to get Redis connection: {}", e))
            })?;
            op(conn).await
        };

        tokio::time::timeout(self.op_timeout, work)
            .await
            .map_err(|_| {
                RehlaError::Timeout(format!(
                    "Cache operation on '{}' exceeded {:?}",
                    key, self.op_timeout
                ))
            })?
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> RehlaResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let value: Option<String> = self
            .run(key, |mut conn| async move {
                conn.get(key).await.map_err(|e| {
                    RehlaError::Cache(format!("Failed to get key '{}': {}", key, e))
                })
            })
            .await?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> RehlaResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        self.run(key, |mut conn| async move {
            let result = match ttl {
                Some(ttl) => {
                    conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
                        .await
                }
                None => conn.set::<_, _, ()>(key, value).await,
            };
            result.map_err(|e| RehlaError::Cache(format!("Failed to set key '{}': {}", key, e)))
        })
        .await?;

        debug!("Cached key '{}' with TTL {:?}", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> RehlaResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let deleted: i64 = self
            .run(key, |mut conn| async move {
                conn.del(key).await.map_err(|e| {
                    RehlaError::Cache(format!("Failed to delete key '{}': {}", key, e))
                })
            })
            .await?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.pool.is_some())
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_is_a_permanent_miss() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());
        cache.set_raw("courses", "[]", None).await.unwrap();
        assert_eq!(cache.get_raw("courses").await.unwrap(), None);
        assert!(!cache.delete("courses").await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_redis_fails_within_timeout() {
        let pool = deadpool_redis::Config::from_url("redis://127.0.0.1:1")
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .unwrap();
        let cache = RedisCacheService::with_timeout(Arc::new(pool), Duration::from_millis(200));
        assert!(cache.get_raw("courses").await.is_err());
    }
}
