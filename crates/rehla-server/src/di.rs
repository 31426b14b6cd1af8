//! Dependency injection module using Shaku.
//!
//! Each binary gets its own module holding only the components it serves:
//! - `WebModule`: subscriber-facing services and the web session resolver
//! - `DashboardModule`: staff-facing services, cache administration and the
//!   dashboard session resolver
//!
//! The external collaborators (document store, object storage, cache, video
//! host) are built from configuration and installed as overrides.

use rehla_config::{AppConfig, RedisConfig};
use rehla_core::{RehlaError, RehlaResult};
use rehla_repository::{
    AnswerRepositoryImpl, ContactRepositoryImpl, CourseRepositoryImpl, DashboardUserRepositoryImpl, DocumentStore,
    ExamRepositoryImpl, InMemoryDocumentStore, InMemoryObjectStorage, LectureRepositoryImpl, MaterialRepositoryImpl,
    ObjectStorage, PaymentRepositoryImpl, SubscriptionRepositoryImpl, UserRepositoryImpl, VideoHost,
    WistiaVideoHost,
};
use rehla_security::PasswordHasher;
use rehla_service::{
    AccountServiceImpl, AnswerServiceImpl, CacheAdminServiceImpl, CacheInterface, CourseServiceImpl,
    DashboardAccountServiceImpl, DashboardSessionResolver, EnrollmentServiceImpl, ExamServiceImpl,
    InMemoryCacheService, LectureServiceImpl, MaterialServiceImpl, RedisCacheService, WebSessionResolver,
};
use shaku::{module, HasComponent, Module, ModuleBuilder};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Shaku Module Definitions
// ============================================================================

module! {
    pub WebModule {
        components = [
            InMemoryDocumentStore,
            InMemoryObjectStorage,
            RedisCacheService,
            WistiaVideoHost,
            PasswordHasher,
            CourseRepositoryImpl,
            LectureRepositoryImpl,
            ExamRepositoryImpl,
            MaterialRepositoryImpl,
            UserRepositoryImpl,
            SubscriptionRepositoryImpl,
            PaymentRepositoryImpl,
            AnswerRepositoryImpl,
            ContactRepositoryImpl,
            CourseServiceImpl,
            LectureServiceImpl,
            ExamServiceImpl,
            MaterialServiceImpl,
            EnrollmentServiceImpl,
            AnswerServiceImpl,
            AccountServiceImpl,
            WebSessionResolver,
        ],
        providers = [],
    }
}

module! {
    pub DashboardModule {
        components = [
            InMemoryDocumentStore,
            InMemoryObjectStorage,
            RedisCacheService,
            WistiaVideoHost,
            PasswordHasher,
            CourseRepositoryImpl,
            LectureRepositoryImpl,
            ExamRepositoryImpl,
            MaterialRepositoryImpl,
            UserRepositoryImpl,
            SubscriptionRepositoryImpl,
            PaymentRepositoryImpl,
            AnswerRepositoryImpl,
            DashboardUserRepositoryImpl,
            CourseServiceImpl,
            LectureServiceImpl,
            ExamServiceImpl,
            MaterialServiceImpl,
            EnrollmentServiceImpl,
            AnswerServiceImpl,
            DashboardAccountServiceImpl,
            CacheAdminServiceImpl,
            DashboardSessionResolver,
        ],
        providers = [],
    }
}

// ============================================================================
// External collaborators
// ============================================================================

/// Long-lived handles to the systems outside the process.
pub struct Backends {
    store: InMemoryDocumentStore,
    storage: InMemoryObjectStorage,
    cache: Box<dyn CacheInterface>,
    video_host: WistiaVideoHost,
}

impl Backends {
    /// Builds every handle from configuration. The store is seeded from
    /// `store.data_file` when set and flushes back to it.
    pub async fn from_config(config: &AppConfig) -> RehlaResult<Self> {
        let store = match &config.store.data_file {
            Some(path) => InMemoryDocumentStore::with_documents(InMemoryDocumentStore::load_snapshot(path).await?)
                .with_snapshot_path(path),
            None => {
                info!("No store data file configured, starting empty");
                InMemoryDocumentStore::new()
            }
        };
        let storage = InMemoryObjectStorage::new(&config.storage.public_base_url, &config.storage.bucket)
            .with_url_ttl(config.storage.signed_url_ttl());

        Ok(Self {
            store,
            storage,
            cache: cache_from_config(&config.redis)?,
            video_host: WistiaVideoHost::new(&config.video)?,
        })
    }

    fn install<M>(self, builder: ModuleBuilder<M>) -> ModuleBuilder<M>
    where
        M: Module
            + HasComponent<dyn DocumentStore>
            + HasComponent<dyn ObjectStorage>
            + HasComponent<dyn CacheInterface>
            + HasComponent<dyn VideoHost>,
    {
        builder
            .with_component_override::<dyn DocumentStore>(Box::new(self.store))
            .with_component_override::<dyn ObjectStorage>(Box::new(self.storage))
            .with_component_override::<dyn CacheInterface>(self.cache)
            .with_component_override::<dyn VideoHost>(Box::new(self.video_host))
    }
}

/// Redis when enabled, otherwise the in-process cache.
fn cache_from_config(config: &RedisConfig) -> RehlaResult<Box<dyn CacheInterface>> {
    if !config.enabled {
        info!("Redis disabled, using the in-process cache");
        return Ok(Box::new(InMemoryCacheService::new()));
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size));
    let pool = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| RehlaError::Cache(format!("Failed to create Redis pool: {}", e)))?;
    info!("Redis cache pool created for {}", config.url);
    Ok(Box::new(RedisCacheService::with_timeout(Arc::new(pool), config.op_timeout())))
}

// ============================================================================
// Module Builders
// ============================================================================

/// Builds the module of the web site.
pub async fn build_web_module(config: &AppConfig) -> RehlaResult<Arc<WebModule>> {
    let backends = Backends::from_config(config).await?;
    let module = backends.install(WebModule::builder()).build();
    Ok(Arc::new(module))
}

/// Builds the module of the dashboard.
pub async fn build_dashboard_module(config: &AppConfig) -> RehlaResult<Arc<DashboardModule>> {
    let backends = Backends::from_config(config).await?;
    let module = backends.install(DashboardModule::builder()).build();
    Ok(Arc::new(module))
}

/// Flushes the document store of a module, logging instead of failing.
pub async fn flush_store<M>(module: &M)
where
    M: Module + HasComponent<dyn DocumentStore>,
{
    let store: Arc<dyn DocumentStore> = module.resolve();
    if let Err(e) = store.flush().await {
        tracing::error!("Failed to flush the document store: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehla_service::{
        AccountService, CacheAdminService, CourseService, DashboardAccountService, NewCourse, SessionResolver,
    };

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        config
    }

    #[test]
    fn test_has_component_trait_bounds() {
        fn _assert_web<T: HasComponent<dyn AccountService> + HasComponent<dyn SessionResolver>>() {}
        fn _assert_dashboard<
            T: HasComponent<dyn DashboardAccountService>
                + HasComponent<dyn CacheAdminService>
                + HasComponent<dyn SessionResolver>,
        >() {
        }

        _assert_web::<WebModule>();
        _assert_dashboard::<DashboardModule>();
    }

    #[tokio::test]
    async fn test_web_module_resolves_services() {
        let module = build_web_module(&config()).await.unwrap();
        let courses: Arc<dyn CourseService> = module.resolve();
        assert!(courses.list_courses().await.unwrap().is_empty());

        let cache: Arc<dyn CacheInterface> = module.resolve();
        assert!(cache.is_enabled());
    }

    #[tokio::test]
    async fn test_components_share_the_overridden_store() {
        let module = build_dashboard_module(&config()).await.unwrap();
        let courses: Arc<dyn CourseService> = module.resolve();
        let course_id = courses
            .create_course(NewCourse {
                title: "Physics".to_string(),
                ..NewCourse::default()
            })
            .await
            .unwrap();

        let admin: Arc<dyn CacheAdminService> = module.resolve();
        admin.refresh_course(&course_id).await.unwrap();
        assert_eq!(courses.list_courses().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_round_trips_through_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.json");
        std::fs::write(&file, r#"{"courses/c1": {"title": "Physics", "active": true}}"#).unwrap();

        let mut config = config();
        config.store.data_file = Some(file.to_string_lossy().into_owned());

        let module = build_web_module(&config).await.unwrap();
        let courses: Arc<dyn CourseService> = module.resolve();
        assert_eq!(courses.get_course("c1").await.unwrap().title, "Physics");

        courses.delete_course("c1").await.unwrap();
        flush_store(module.as_ref()).await;
        assert_eq!(InMemoryDocumentStore::load_snapshot(&file).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_redis_pool_is_lazy() {
        let config = RedisConfig {
            enabled: true,
            url: "redis://127.0.0.1:1".to_string(),
            ..RedisConfig::default()
        };
        let cache = cache_from_config(&config).unwrap();
        assert!(cache.is_enabled());
    }
}
