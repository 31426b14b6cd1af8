//! Session resolution.
//!
//! A session token is looked up in the cache first. On a miss the store is
//! searched by session id and the cache is refilled with a 24 hour expiry.
//! A token nobody owns leaves the request anonymous.

use crate::cache::{CacheAside, CacheInterface, CacheKey};
use async_trait::async_trait;
use rehla_core::{Interface, RehlaResult, SessionToken};
use rehla_security::{AuthContext, Principal};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Lifetime of a cached session.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Resolves a session token to the request's auth context.
#[async_trait]
pub trait SessionResolver: Interface + Send + Sync {
    /// Returns `Authenticated` for a known token and `Anonymous` otherwise.
    async fn resolve(&self, token: &SessionToken) -> RehlaResult<AuthContext>;
}

/// Which backend a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Web,
    Dashboard,
}

impl SessionKind {
    /// Cache key of a token.
    #[must_use]
    pub fn key(self, token: &str) -> CacheKey {
        match self {
            Self::Web => CacheKey::session(token),
            Self::Dashboard => CacheKey::dashboard_session(token),
        }
    }
}

/// Session entries in the cache.
#[derive(Debug, Clone, Copy)]
pub struct SessionCache<'a> {
    aside: CacheAside<'a>,
    kind: SessionKind,
}

impl<'a> SessionCache<'a> {
    #[must_use]
    pub fn new(cache: &'a dyn CacheInterface, kind: SessionKind) -> Self {
        Self {
            aside: CacheAside::new(cache),
            kind,
        }
    }

    /// Resolves `token`, falling back to `load` on a cache miss.
    pub async fn resolve<F, Fut>(&self, token: &SessionToken, load: F) -> RehlaResult<Option<Principal>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = RehlaResult<Option<Principal>>> + Send,
    {
        let key = self.kind.key(token.as_str());
        if let Some(principal) = self.aside.lookup::<Principal>(&key).await {
            debug!("Session {} resolved from cache", key);
            return Ok(Some(principal));
        }

        let principal = load().await?;
        if let Some(principal) = &principal {
            self.aside.fill(&key, principal, Some(SESSION_TTL)).await;
        }
        Ok(principal)
    }

    /// Caches a freshly issued session.
    pub async fn remember(&self, token: &SessionToken, principal: &Principal) {
        self.aside
            .fill(&self.kind.key(token.as_str()), principal, Some(SESSION_TTL))
            .await;
    }

    /// Drops a session from the cache.
    pub async fn forget(&self, token: &str) {
        if token.is_empty() {
            return;
        }
        self.aside.delete_logged(&self.kind.key(token)).await;
    }
}

/// Maps an optional principal to an auth context.
#[must_use]
pub fn auth_context(principal: Option<Principal>) -> AuthContext {
    principal.map_or(AuthContext::Anonymous, AuthContext::Authenticated)
}
