//! Application state for Axum handlers.

use axum_extra::extract::cookie::{Cookie, SameSite};
use metrics_exporter_prometheus::PrometheusHandle;
use rehla_config::AppConfig;
use rehla_core::SessionToken;
use rehla_service::{
    AccountService, AnswerService, CacheAdminService, CourseService, DashboardAccountService,
    EnrollmentService, ExamService, LectureService, MaterialService, SessionResolver,
};
use shaku::{HasComponent, Module};
use std::sync::Arc;
use std::time::Duration;

/// How the session cookie of a backend is written.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
    pub lifetime: Duration,
}

impl CookieSettings {
    /// Cookie settings of the web site.
    #[must_use]
    pub fn web(config: &AppConfig) -> Self {
        Self {
            name: config.session.web_cookie.clone(),
            secure: config.server.secure_cookies,
            lifetime: config.session.lifetime(),
        }
    }

    /// Cookie settings of the dashboard.
    #[must_use]
    pub fn dashboard(config: &AppConfig) -> Self {
        Self {
            name: config.session.dashboard_cookie.clone(),
            secure: config.server.secure_cookies,
            lifetime: config.session.lifetime(),
        }
    }

    /// The cookie carrying a freshly issued session token.
    #[must_use]
    pub fn session_cookie(&self, token: &SessionToken) -> Cookie<'static> {
        let max_age = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        Cookie::build((self.name.clone(), token.as_str().to_string()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::seconds(max_age))
            .build()
    }

    /// A cookie that, passed to `CookieJar::remove`, clears the session.
    #[must_use]
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), "")).path("/").build()
    }
}

/// Shared state of the web site.
#[derive(Clone)]
pub struct WebState {
    pub course_service: Arc<dyn CourseService>,
    pub lecture_service: Arc<dyn LectureService>,
    pub exam_service: Arc<dyn ExamService>,
    pub material_service: Arc<dyn MaterialService>,
    pub enrollment_service: Arc<dyn EnrollmentService>,
    pub answer_service: Arc<dyn AnswerService>,
    pub account_service: Arc<dyn AccountService>,
    pub session_resolver: Arc<dyn SessionResolver>,
    pub cookie: CookieSettings,
    pub metrics: Option<PrometheusHandle>,
}

impl WebState {
    /// Resolves every service from a Shaku module.
    pub fn from_module<M>(module: &M, cookie: CookieSettings, metrics: Option<PrometheusHandle>) -> Self
    where
        M: Module
            + HasComponent<dyn CourseService>
            + HasComponent<dyn LectureService>
            + HasComponent<dyn ExamService>
            + HasComponent<dyn MaterialService>
            + HasComponent<dyn EnrollmentService>
            + HasComponent<dyn AnswerService>
            + HasComponent<dyn AccountService>
            + HasComponent<dyn SessionResolver>,
    {
        Self {
            course_service: module.resolve(),
            lecture_service: module.resolve(),
            exam_service: module.resolve(),
            material_service: module.resolve(),
            enrollment_service: module.resolve(),
            answer_service: module.resolve(),
            account_service: module.resolve(),
            session_resolver: module.resolve(),
            cookie,
            metrics,
        }
    }
}

/// Shared state of the dashboard.
#[derive(Clone)]
pub struct DashboardState {
    pub course_service: Arc<dyn CourseService>,
    pub lecture_service: Arc<dyn LectureService>,
    pub exam_service: Arc<dyn ExamService>,
    pub material_service: Arc<dyn MaterialService>,
    pub enrollment_service: Arc<dyn EnrollmentService>,
    pub answer_service: Arc<dyn AnswerService>,
    pub account_service: Arc<dyn DashboardAccountService>,
    pub cache_admin_service: Arc<dyn CacheAdminService>,
    pub session_resolver: Arc<dyn SessionResolver>,
    pub cookie: CookieSettings,
    pub metrics: Option<PrometheusHandle>,
}

impl DashboardState {
    /// Resolves every service from a Shaku module.
    pub fn from_module<M>(module: &M, cookie: CookieSettings, metrics: Option<PrometheusHandle>) -> Self
    where
        M: Module
            + HasComponent<dyn CourseService>
            + HasComponent<dyn LectureService>
            + HasComponent<dyn ExamService>
            + HasComponent<dyn MaterialService>
            + HasComponent<dyn EnrollmentService>
            + HasComponent<dyn AnswerService>
            + HasComponent<dyn DashboardAccountService>
            + HasComponent<dyn CacheAdminService>
            + HasComponent<dyn SessionResolver>,
    {
        Self {
            course_service: module.resolve(),
            lecture_service: module.resolve(),
            exam_service: module.resolve(),
            material_service: module.resolve(),
            enrollment_service: module.resolve(),
            answer_service: module.resolve(),
            account_service: module.resolve(),
            cache_admin_service: module.resolve(),
            session_resolver: module.resolve(),
            cookie,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let settings = CookieSettings {
            name: "session_id".to_string(),
            secure: true,
            lifetime: Duration::from_secs(86_400),
        };
        let token = SessionToken::generate();
        let cookie = settings.session_cookie(&token);
        assert_eq!(cookie.name(), "session_id");
        assert_eq!(cookie.value(), token.as_str());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86_400)));
    }
}
