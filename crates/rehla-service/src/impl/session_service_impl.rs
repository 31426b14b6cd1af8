//! Session resolvers for the web site and the dashboard.

use crate::cache::CacheInterface;
use crate::session_service::{auth_context, SessionCache, SessionKind, SessionResolver};
use async_trait::async_trait;
use rehla_core::{RehlaResult, SessionToken};
use rehla_repository::{DashboardUserRepository, UserRepository};
use rehla_security::{AuthContext, Principal};
use shaku::Component;
use std::sync::Arc;

/// Resolves subscriber sessions.
#[derive(Component)]
#[shaku(interface = SessionResolver)]
pub struct WebSessionResolver {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl WebSessionResolver {
    pub fn new(user_repository: Arc<dyn UserRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self { user_repository, cache }
    }
}

#[async_trait]
impl SessionResolver for WebSessionResolver {
    async fn resolve(&self, token: &SessionToken) -> RehlaResult<AuthContext> {
        let repository = &self.user_repository;
        let principal = SessionCache::new(self.cache.as_ref(), SessionKind::Web)
            .resolve(token, || async move {
                Ok(repository
                    .find_by_session(token.as_str())
                    .await?
                    .as_ref()
                    .map(Principal::from))
            })
            .await?;
        Ok(auth_context(principal))
    }
}

/// Resolves staff sessions.
#[derive(Component)]
#[shaku(interface = SessionResolver)]
pub struct DashboardSessionResolver {
    #[shaku(inject)]
    staff_repository: Arc<dyn DashboardUserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl DashboardSessionResolver {
    pub fn new(staff_repository: Arc<dyn DashboardUserRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self { staff_repository, cache }
    }
}

#[async_trait]
impl SessionResolver for DashboardSessionResolver {
    async fn resolve(&self, token: &SessionToken) -> RehlaResult<AuthContext> {
        let repository = &self.staff_repository;
        let principal = SessionCache::new(self.cache.as_ref(), SessionKind::Dashboard)
            .resolve(token, || async move {
                Ok(repository
                    .find_by_session(token.as_str())
                    .await?
                    .as_ref()
                    .map(Principal::from))
            })
            .await?;
        Ok(auth_context(principal))
    }
}

impl std::fmt::Debug for WebSessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSessionResolver").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for DashboardSessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSessionResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheInterface as _;
    use crate::session_service::SESSION_TTL;
    use crate::test_support::{FailingCache, Fixture};
    use rehla_core::{DashboardUser, FieldUpdates, Role, User};
    use rehla_repository::{DashboardUserRepository as _, UserRepository as _};

    async fn user_with_session(fx: &Fixture, token: &SessionToken) -> String {
        fx.users()
            .create(&User {
                firstname: "Sara".to_string(),
                lastname: "Hadi".to_string(),
                phone_number: "07701234567".to_string(),
                session_id: token.as_str().to_string(),
                ..User::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_miss_loads_from_store_and_fills_cache() {
        let fx = Fixture::new();
        let token = SessionToken::generate();
        let user_id = user_with_session(&fx, &token).await;
        let resolver = WebSessionResolver::new(fx.users(), fx.cache.clone());

        let context = resolver.resolve(&token).await.unwrap();
        assert_eq!(context.principal().map(|p| p.user_id.as_str()), Some(user_id.as_str()));

        let key = format!("session:{}", token);
        assert!(fx.cache.get_raw(&key).await.unwrap().is_some());
        assert_eq!(fx.cache.ttl_of(&key), Some(SESSION_TTL));
    }

    #[tokio::test]
    async fn test_cached_session_skips_store() {
        let fx = Fixture::new();
        let token = SessionToken::generate();
        let user_id = user_with_session(&fx, &token).await;
        let resolver = WebSessionResolver::new(fx.users(), fx.cache.clone());
        resolver.resolve(&token).await.unwrap();

        fx.users()
            .update(&user_id, &FieldUpdates::new().set("session_id", ""))
            .await
            .unwrap();
        assert!(resolver.resolve(&token).await.unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let fx = Fixture::new();
        let resolver = WebSessionResolver::new(fx.users(), fx.cache.clone());
        let context = resolver.resolve(&SessionToken::generate()).await.unwrap();
        assert!(!context.is_authenticated());
        assert!(fx.cache.is_empty());
    }

    #[tokio::test]
    async fn test_cache_outage_falls_back_to_store() {
        let fx = Fixture::new();
        let token = SessionToken::generate();
        user_with_session(&fx, &token).await;
        let resolver = WebSessionResolver::new(fx.users(), Arc::new(FailingCache::default()));
        assert!(resolver.resolve(&token).await.unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_dashboard_sessions_carry_role() {
        let fx = Fixture::new();
        let token = SessionToken::generate();
        fx.staff()
            .create(&DashboardUser {
                id: String::new(),
                username: "grader".to_string(),
                role: Role::Corrector,
                password_hash: String::new(),
                session_id: token.as_str().to_string(),
                course_ids: vec!["c1".to_string()],
            })
            .await
            .unwrap();
        let resolver = DashboardSessionResolver::new(fx.staff(), fx.cache.clone());

        let context = resolver.resolve(&token).await.unwrap();
        let principal = context.principal().unwrap();
        assert_eq!(principal.role, Role::Corrector);
        assert!(principal.can_correct("c1"));
        assert!(fx
            .cache
            .get_raw(&format!("dashboard_session:{}", token))
            .await
            .unwrap()
            .is_some());
    }
}
