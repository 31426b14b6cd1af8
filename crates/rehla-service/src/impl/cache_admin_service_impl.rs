//! Cache administration implementation.
//!
//! Each refresh reads the authoritative store and overwrites the matching
//! cache entries. A failed write deletes the entry instead, so readers fall
//! back to the store.

use crate::cache::{CacheAside, CacheInterface, CacheKey};
use crate::cache_admin_service::CacheAdminService;
use async_trait::async_trait;
use rehla_core::RehlaResult;
use rehla_repository::{CourseRepository, ExamRepository, LectureRepository, MaterialRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::{info, warn};

/// Rebuilds cache entries from the store on an admin's request.
#[derive(Component)]
#[shaku(interface = CacheAdminService)]
pub struct CacheAdminServiceImpl {
    #[shaku(inject)]
    course_repository: Arc<dyn CourseRepository>,
    #[shaku(inject)]
    lecture_repository: Arc<dyn LectureRepository>,
    #[shaku(inject)]
    exam_repository: Arc<dyn ExamRepository>,
    #[shaku(inject)]
    material_repository: Arc<dyn MaterialRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl CacheAdminServiceImpl {
    /// Creates a new cache admin service.
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        lecture_repository: Arc<dyn LectureRepository>,
        exam_repository: Arc<dyn ExamRepository>,
        material_repository: Arc<dyn MaterialRepository>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            course_repository,
            lecture_repository,
            exam_repository,
            material_repository,
            cache,
        }
    }

    fn cache(&self) -> CacheAside<'_> {
        CacheAside::new(self.cache.as_ref())
    }
}

#[async_trait]
impl CacheAdminService for CacheAdminServiceImpl {
    fn is_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    async fn refresh_course(&self, course_id: &str) -> RehlaResult<()> {
        let key = CacheKey::course(course_id);
        match self.course_repository.find_by_id(course_id).await? {
            Some(course) => self.cache().refresh(&key, &course).await?,
            None => {
                warn!("Course {} no longer exists, dropping its cache entry", course_id);
                self.cache().delete_logged(&key).await;
            }
        }

        let courses = self.course_repository.find_all().await?;
        self.cache().refresh(&CacheKey::Courses, &courses).await?;
        info!("Refreshed course {} and the course list", course_id);
        Ok(())
    }

    async fn refresh_lectures(&self, course_id: &str) -> RehlaResult<usize> {
        let lectures = self.lecture_repository.find_all(course_id).await?;
        for lecture in &lectures {
            self.cache()
                .refresh(&CacheKey::lecture(course_id, &lecture.id), lecture)
                .await?;
        }
        self.cache()
            .refresh(&CacheKey::lectures(course_id), &lectures)
            .await?;
        info!("Refreshed {} lectures of {}", lectures.len(), course_id);
        Ok(lectures.len())
    }

    async fn refresh_exams(&self, course_id: &str) -> RehlaResult<usize> {
        let exams = self.exam_repository.find_all(course_id).await?;
        for exam in &exams {
            self.cache()
                .refresh(&CacheKey::exam(course_id, &exam.id), exam)
                .await?;
        }
        self.cache().refresh(&CacheKey::exams(course_id), &exams).await?;
        info!("Refreshed {} exams of {}", exams.len(), course_id);
        Ok(exams.len())
    }

    async fn refresh_materials(&self, course_id: &str) -> RehlaResult<usize> {
        let materials = self.material_repository.find_all(course_id).await?;
        self.cache()
            .refresh(&CacheKey::materials(course_id), &materials)
            .await?;
        info!("Refreshed {} materials of {}", materials.len(), course_id);
        Ok(materials.len())
    }
}

impl std::fmt::Debug for CacheAdminServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAdminServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheInterface as _;
    use crate::test_support::{FailingCache, Fixture};
    use rehla_core::{Course, FieldUpdates, Lecture};
    use rehla_repository::{CourseRepository as _, LectureRepository as _};

    fn service(fx: &Fixture, cache: Arc<dyn CacheInterface>) -> CacheAdminServiceImpl {
        CacheAdminServiceImpl::new(fx.courses(), fx.lectures(), fx.exams(), fx.materials(), cache)
    }

    #[tokio::test]
    async fn test_refresh_course_overwrites_stale_entry() {
        let fx = Fixture::new();
        let course_id = fx
            .courses()
            .create(&Course {
                title: "Old".to_string(),
                ..Course::default()
            })
            .await
            .unwrap();
        let service = service(&fx, fx.cache.clone());
        service.refresh_course(&course_id).await.unwrap();

        fx.courses()
            .update(&course_id, &FieldUpdates::new().set("title", "New"))
            .await
            .unwrap();
        service.refresh_course(&course_id).await.unwrap();

        let cache = CacheAside::new(fx.cache.as_ref());
        let cached: Course = cache.lookup(&CacheKey::course(&course_id)).await.unwrap();
        assert_eq!(cached.title, "New");
        let list: Vec<Course> = cache.lookup(&CacheKey::Courses).await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_missing_course_drops_entry() {
        let fx = Fixture::new();
        fx.cache.set_raw("course:gone", "{\"title\":\"x\"}", None).await.unwrap();
        service(&fx, fx.cache.clone()).refresh_course("gone").await.unwrap();
        assert!(fx.cache.get_raw("course:gone").await.unwrap().is_none());
        assert!(fx.cache.get_raw("courses").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_refresh_lectures_counts_and_writes_items() {
        let fx = Fixture::new();
        for order in 1..=2 {
            fx.lectures()
                .create(
                    "c1",
                    &Lecture {
                        title: format!("Lecture {}", order),
                        order,
                        ..Lecture::default()
                    },
                )
                .await
                .unwrap();
        }
        let refreshed = service(&fx, fx.cache.clone()).refresh_lectures("c1").await.unwrap();
        assert_eq!(refreshed, 2);
        // two lectures plus the list
        assert_eq!(fx.cache.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_write_deletes_and_reports() {
        let fx = Fixture::new();
        let cache = Arc::new(FailingCache::failing_writes());
        cache.seed("course:c1:mats", "[]");
        let result = service(&fx, cache.clone()).refresh_materials("c1").await;
        assert!(result.is_err());
        assert_eq!(cache.delete_calls(), 1);
        assert!(cache.get_raw("course:c1:mats").await.unwrap().is_none());
    }
}
