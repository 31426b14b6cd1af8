//! Fakes shared by the unit tests of this crate.

use crate::cache::{CacheInterface, InMemoryCacheService};
use async_trait::async_trait;
use parking_lot::Mutex;
use rehla_core::{RehlaError, RehlaResult};
use rehla_repository::{
    AnswerRepositoryImpl, CourseRepositoryImpl, DashboardUserRepositoryImpl, DocumentStore,
    ExamRepositoryImpl, InMemoryDocumentStore, InMemoryObjectStorage, LectureRepositoryImpl,
    MaterialRepositoryImpl, ObjectStorage, PaymentRepositoryImpl, StoredObject, SubscriptionRepositoryImpl,
    UserRepositoryImpl, VideoHost,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A cache whose operations fail on demand.
pub struct FailingCache {
    inner: InMemoryCacheService,
    fail_reads: bool,
    fail_writes: bool,
    fail_deletes: bool,
    deletes: AtomicUsize,
}

impl Default for FailingCache {
    fn default() -> Self {
        Self {
            inner: InMemoryCacheService::new(),
            fail_reads: true,
            fail_writes: true,
            fail_deletes: true,
            deletes: AtomicUsize::new(0),
        }
    }
}

impl FailingCache {
    pub fn failing_writes() -> Self {
        Self {
            fail_reads: false,
            fail_deletes: false,
            ..Self::default()
        }
    }

    pub fn seed(&self, key: &str, value: &str) {
        futures::executor::block_on(self.inner.set_raw(key, value, None)).unwrap();
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn unavailable() -> RehlaError {
        RehlaError::Cache("connection refused".to_string())
    }
}

#[async_trait]
impl CacheInterface for FailingCache {
    async fn get_raw(&self, key: &str) -> RehlaResult<Option<String>> {
        if self.fail_reads {
            return Err(Self::unavailable());
        }
        self.inner.get_raw(key).await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> RehlaResult<()> {
        if self.fail_writes {
            return Err(Self::unavailable());
        }
        self.inner.set_raw(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> RehlaResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes {
            return Err(Self::unavailable());
        }
        self.inner.delete(key).await
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Object storage whose uploads or listings fail on demand.
pub struct FailingStorage {
    inner: InMemoryObjectStorage,
    fail_uploads: bool,
    fail_lists: bool,
}

impl FailingStorage {
    pub fn failing_uploads() -> Self {
        Self {
            inner: InMemoryObjectStorage::new("http://files.local", "rehla"),
            fail_uploads: true,
            fail_lists: false,
        }
    }

    pub fn failing_lists() -> Self {
        Self {
            fail_uploads: false,
            fail_lists: true,
            ..Self::failing_uploads()
        }
    }

    fn down() -> RehlaError {
        RehlaError::Storage("down".to_string())
    }
}

#[async_trait]
impl ObjectStorage for FailingStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> RehlaResult<()> {
        if self.fail_uploads {
            return Err(Self::down());
        }
        self.inner.upload(path, bytes, content_type).await
    }

    async fn download(&self, path: &str) -> RehlaResult<Option<StoredObject>> {
        self.inner.download(path).await
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> RehlaResult<String> {
        self.inner.signed_url(path, ttl).await
    }

    async fn delete(&self, path: &str) -> RehlaResult<bool> {
        self.inner.delete(path).await
    }

    async fn list(&self, prefix: &str) -> RehlaResult<Vec<String>> {
        if self.fail_lists {
            return Err(Self::down());
        }
        self.inner.list(prefix).await
    }

    fn public_url(&self, path: &str) -> String {
        self.inner.public_url(path)
    }

    fn url_ttl(&self) -> Duration {
        self.inner.url_ttl()
    }
}

/// A video host that records calls instead of making them.
#[derive(Default)]
pub struct RecordingVideoHost {
    pub folders: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl VideoHost for RecordingVideoHost {
    async fn create_folder(&self, name: &str) -> RehlaResult<Option<String>> {
        self.folders.lock().push(name.to_string());
        Ok(Some(format!("folder-{}", self.folders.lock().len())))
    }

    async fn delete_video(&self, hashed_id: &str) -> RehlaResult<()> {
        self.deleted.lock().push(hashed_id.to_string());
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Every repository over one shared in-memory store.
pub struct Fixture {
    pub store: Arc<dyn DocumentStore>,
    pub cache: Arc<InMemoryCacheService>,
    pub storage: Arc<InMemoryObjectStorage>,
    pub video: Arc<RecordingVideoHost>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryDocumentStore::new()),
            cache: Arc::new(InMemoryCacheService::new()),
            storage: Arc::new(InMemoryObjectStorage::new("http://files.local", "rehla")),
            video: Arc::new(RecordingVideoHost::default()),
        }
    }

    pub fn courses(&self) -> Arc<CourseRepositoryImpl> {
        Arc::new(CourseRepositoryImpl::new(self.store.clone()))
    }

    pub fn lectures(&self) -> Arc<LectureRepositoryImpl> {
        Arc::new(LectureRepositoryImpl::new(self.store.clone()))
    }

    pub fn exams(&self) -> Arc<ExamRepositoryImpl> {
        Arc::new(ExamRepositoryImpl::new(self.store.clone()))
    }

    pub fn materials(&self) -> Arc<MaterialRepositoryImpl> {
        Arc::new(MaterialRepositoryImpl::new(self.store.clone()))
    }

    pub fn users(&self) -> Arc<UserRepositoryImpl> {
        Arc::new(UserRepositoryImpl::new(self.store.clone()))
    }

    pub fn subscriptions(&self) -> Arc<SubscriptionRepositoryImpl> {
        Arc::new(SubscriptionRepositoryImpl::new(self.store.clone()))
    }

    pub fn payments(&self) -> Arc<PaymentRepositoryImpl> {
        Arc::new(PaymentRepositoryImpl::new(self.store.clone()))
    }

    pub fn answers(&self) -> Arc<AnswerRepositoryImpl> {
        Arc::new(AnswerRepositoryImpl::new(self.store.clone()))
    }

    pub fn staff(&self) -> Arc<DashboardUserRepositoryImpl> {
        Arc::new(DashboardUserRepositoryImpl::new(self.store.clone()))
    }
}
