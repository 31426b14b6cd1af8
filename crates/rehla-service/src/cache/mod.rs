//! Caching infrastructure for the service layer.
//!
//! A key-value cache sits in front of the document store. Entity entries
//! never expire on their own; session entries carry a 24 hour expiry.
//! [`CacheAside`] is the only code that decides when to read, fill and
//! invalidate.

mod cache_aside;
mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_aside::{CacheAside, CacheEntry};
pub use cache_interface::CacheInterface;
pub use cache_keys::CacheKey;
pub use memory_cache::{InMemoryCacheService, InMemoryCacheServiceParameters};
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters, DEFAULT_OP_TIMEOUT};
