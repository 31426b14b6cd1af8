//! In-memory backend shared by the router tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use rehla_config::AppConfig;
use rehla_core::SessionToken;
use rehla_repository::{
    AnswerRepositoryImpl, ContactRepositoryImpl, CourseRepositoryImpl, DashboardUserRepositoryImpl, DocumentStore,
    ExamRepositoryImpl, InMemoryDocumentStore, InMemoryObjectStorage, LectureRepositoryImpl, MaterialRepositoryImpl,
    ObjectStorage, PaymentRepositoryImpl, SubscriptionRepositoryImpl, UserRepositoryImpl, VideoHost,
    WistiaVideoHost,
};
use rehla_rest::{create_dashboard_router, create_web_router, CookieSettings, DashboardState, WebState};
use rehla_security::{PasswordHasher, PasswordHasherInterface};
use rehla_service::{
    AccountServiceImpl, AnswerServiceImpl, CacheAdminServiceImpl, CacheInterface, CourseServiceImpl,
    DashboardAccountServiceImpl, DashboardSessionResolver, EnrollmentServiceImpl, ExamServiceImpl,
    InMemoryCacheService, LectureServiceImpl, MaterialServiceImpl, WebSessionResolver,
};
use std::sync::Arc;
use tower::ServiceExt;

/// Every service wired over one in-memory store, cache and bucket.
pub struct Backend {
    pub config: AppConfig,
    pub course_service: Arc<CourseServiceImpl>,
    pub lecture_service: Arc<LectureServiceImpl>,
    pub exam_service: Arc<ExamServiceImpl>,
    pub material_service: Arc<MaterialServiceImpl>,
    pub enrollment_service: Arc<EnrollmentServiceImpl>,
    pub answer_service: Arc<AnswerServiceImpl>,
    pub account_service: Arc<AccountServiceImpl>,
    pub dashboard_account_service: Arc<DashboardAccountServiceImpl>,
    pub cache_admin_service: Arc<CacheAdminServiceImpl>,
    pub web_sessions: Arc<WebSessionResolver>,
    pub dashboard_sessions: Arc<DashboardSessionResolver>,
}

impl Backend {
    pub fn new() -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let cache: Arc<dyn CacheInterface> = Arc::new(InMemoryCacheService::new());
        let storage: Arc<dyn ObjectStorage> = Arc::new(InMemoryObjectStorage::new("http://files.local", "rehla"));
        let video_host: Arc<dyn VideoHost> = Arc::new(WistiaVideoHost::disabled());
        let hasher: Arc<dyn PasswordHasherInterface> = Arc::new(PasswordHasher::with_cost(1));

        let courses = Arc::new(CourseRepositoryImpl::new(store.clone()));
        let lectures = Arc::new(LectureRepositoryImpl::new(store.clone()));
        let exams = Arc::new(ExamRepositoryImpl::new(store.clone()));
        let materials = Arc::new(MaterialRepositoryImpl::new(store.clone()));
        let users = Arc::new(UserRepositoryImpl::new(store.clone()));
        let subscriptions = Arc::new(SubscriptionRepositoryImpl::new(store.clone()));
        let payments = Arc::new(PaymentRepositoryImpl::new(store.clone()));
        let answers = Arc::new(AnswerRepositoryImpl::new(store.clone()));
        let staff = Arc::new(DashboardUserRepositoryImpl::new(store.clone()));
        let contacts = Arc::new(ContactRepositoryImpl::new(store));

        Self {
            config: AppConfig::default(),
            course_service: Arc::new(CourseServiceImpl::new(
                courses.clone(),
                lectures.clone(),
                exams.clone(),
                storage.clone(),
                video_host.clone(),
                cache.clone(),
            )),
            lecture_service: Arc::new(LectureServiceImpl::new(
                courses.clone(),
                lectures.clone(),
                video_host,
                cache.clone(),
            )),
            exam_service: Arc::new(ExamServiceImpl::new(
                courses.clone(),
                exams.clone(),
                storage.clone(),
                cache.clone(),
            )),
            material_service: Arc::new(MaterialServiceImpl::new(
                courses.clone(),
                materials.clone(),
                storage.clone(),
                cache.clone(),
            )),
            enrollment_service: Arc::new(EnrollmentServiceImpl::new(
                courses.clone(),
                subscriptions,
                payments,
                cache.clone(),
            )),
            answer_service: Arc::new(AnswerServiceImpl::new(
                exams.clone(),
                users.clone(),
                answers,
                storage.clone(),
                cache.clone(),
            )),
            account_service: Arc::new(AccountServiceImpl::new(
                users.clone(),
                contacts,
                hasher.clone(),
                storage,
                cache.clone(),
            )),
            dashboard_account_service: Arc::new(DashboardAccountServiceImpl::new(
                staff.clone(),
                users.clone(),
                hasher,
                cache.clone(),
            )),
            cache_admin_service: Arc::new(CacheAdminServiceImpl::new(
                courses,
                lectures,
                exams,
                materials,
                cache.clone(),
            )),
            web_sessions: Arc::new(WebSessionResolver::new(users, cache.clone())),
            dashboard_sessions: Arc::new(DashboardSessionResolver::new(staff, cache)),
        }
    }

    pub fn web(&self) -> Router {
        let state = WebState {
            course_service: self.course_service.clone(),
            lecture_service: self.lecture_service.clone(),
            exam_service: self.exam_service.clone(),
            material_service: self.material_service.clone(),
            enrollment_service: self.enrollment_service.clone(),
            answer_service: self.answer_service.clone(),
            account_service: self.account_service.clone(),
            session_resolver: self.web_sessions.clone(),
            cookie: CookieSettings::web(&self.config),
            metrics: None,
        };
        create_web_router(state, &self.config)
    }

    pub fn dashboard(&self) -> Router {
        let state = DashboardState {
            course_service: self.course_service.clone(),
            lecture_service: self.lecture_service.clone(),
            exam_service: self.exam_service.clone(),
            material_service: self.material_service.clone(),
            enrollment_service: self.enrollment_service.clone(),
            answer_service: self.answer_service.clone(),
            account_service: self.dashboard_account_service.clone(),
            cache_admin_service: self.cache_admin_service.clone(),
            session_resolver: self.dashboard_sessions.clone(),
            cookie: CookieSettings::dashboard(&self.config),
            metrics: None,
        };
        create_dashboard_router(state, &self.config)
    }

    pub fn web_cookie(&self, token: &SessionToken) -> String {
        format!("{}={}", self.config.session.web_cookie, token)
    }

    pub fn dashboard_cookie(&self, token: &SessionToken) -> String {
        format!("{}={}", self.config.session.dashboard_cookie, token)
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn header_value<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|value| value.to_str().ok())
}
