//! Course and lecture service implementations.

use crate::cache::{CacheAside, CacheInterface, CacheKey};
use crate::course_service::{CourseService, LectureService};
use crate::dto::{CourseUpdate, NewCourse, NewLecture, Upload, IMAGE_TYPES};
use async_trait::async_trait;
use rehla_core::rules::positive_order;
use rehla_core::{
    Course, CourseOverview, FieldUpdates, Lecture, LecturePatch, RehlaError, RehlaResult,
    ValidateExt,
};
use rehla_repository::{CourseRepository, ExamRepository, LectureRepository, ObjectStorage, VideoHost};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Course service backed by the course repositories, the cache, object
/// storage and the video host.
#[derive(Component)]
#[shaku(interface = CourseService)]
pub struct CourseServiceImpl {
    #[shaku(inject)]
    course_repository: Arc<dyn CourseRepository>,
    #[shaku(inject)]
    lecture_repository: Arc<dyn LectureRepository>,
    #[shaku(inject)]
    exam_repository: Arc<dyn ExamRepository>,
    #[shaku(inject)]
    storage: Arc<dyn ObjectStorage>,
    #[shaku(inject)]
    video_host: Arc<dyn VideoHost>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl CourseServiceImpl {
    /// Creates a new course service.
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        lecture_repository: Arc<dyn LectureRepository>,
        exam_repository: Arc<dyn ExamRepository>,
        storage: Arc<dyn ObjectStorage>,
        video_host: Arc<dyn VideoHost>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            course_repository,
            lecture_repository,
            exam_repository,
            storage,
            video_host,
            cache,
        }
    }

    fn cache(&self) -> CacheAside<'_> {
        CacheAside::new(self.cache.as_ref())
    }

    /// Uploads a course image and returns `(url, path)`.
    async fn upload_image(&self, course_id: &str, name: &str, image: Upload) -> RehlaResult<(String, String)> {
        let content_type = image.check(IMAGE_TYPES)?;
        let path = format!("courses/{}/{}", course_id, name);
        self.storage.upload(&path, image.bytes, content_type).await?;
        Ok((self.storage.public_url(&path), path))
    }

    async fn remove_course_files(&self, course_id: &str) {
        let paths = match self.storage.list(&format!("courses/{}/", course_id)).await {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Failed to list files of course {}: {}", course_id, e);
                return;
            }
        };
        for path in paths {
            if let Err(e) = self.storage.delete(&path).await {
                warn!("Failed to delete {} of course {}: {}", path, course_id, e);
            }
        }
    }

    /// Undoes a course whose images could not be stored.
    async fn remove_partial_course(&self, course_id: &str) {
        if let Err(e) = self.course_repository.delete(course_id).await {
            warn!("Failed to remove partially created course {}: {}", course_id, e);
        }
        self.remove_course_files(course_id).await;
        self.cache().invalidate(&CacheKey::course(course_id)).await;
    }

    async fn image_updates(
        &self,
        course_id: &str,
        cover: Option<Upload>,
        teacher_img: Option<Upload>,
    ) -> RehlaResult<FieldUpdates> {
        let mut updates = FieldUpdates::new();
        if let Some(cover) = cover {
            let (url, path) = self.upload_image(course_id, "cover", cover).await?;
            updates = updates.set("cover", url).set("cover_path", path);
        }
        if let Some(teacher_img) = teacher_img {
            let (url, path) = self.upload_image(course_id, "teacher", teacher_img).await?;
            updates = updates.set("teacher_img", url).set("file_path", path);
        }
        Ok(updates)
    }
}

#[async_trait]
impl CourseService for CourseServiceImpl {
    async fn get_course(&self, course_id: &str) -> RehlaResult<Course> {
        debug!("Getting course: {}", course_id);
        let repository = &self.course_repository;
        self.cache()
            .read_through(&CacheKey::course(course_id), || async move {
                repository
                    .find_by_id(course_id)
                    .await?
                    .ok_or_else(|| RehlaError::not_found("Course", course_id))
            })
            .await
    }

    async fn list_courses(&self) -> RehlaResult<Vec<Course>> {
        let repository = &self.course_repository;
        self.cache()
            .read_through(&CacheKey::Courses, || async move { repository.find_all().await })
            .await
    }

    async fn list_active_courses(&self) -> RehlaResult<Vec<Course>> {
        let mut courses = self.list_courses().await?;
        courses.retain(|c| c.active);
        Ok(courses)
    }

    async fn get_overview(&self, course_id: &str) -> RehlaResult<CourseOverview> {
        debug!("Getting course overview: {}", course_id);
        let mut course = self.get_course(course_id).await?;

        let cache = self.cache();
        let lectures_key = CacheKey::lectures(course_id);
        let exams_key = CacheKey::exams(course_id);
        let lectures_repository = &self.lecture_repository;
        let exams_repository = &self.exam_repository;
        let (lectures, exams) = futures::try_join!(
            cache.read_through(&lectures_key, || async move {
                lectures_repository.find_all(course_id).await
            }),
            cache.read_through(&exams_key, || async move {
                exams_repository.find_all(course_id).await
            }),
        )?;
        course.number_of_lecs = i64::try_from(lectures.len()).unwrap_or(i64::MAX);

        Ok(CourseOverview {
            course,
            lectures,
            exams,
        })
    }

    async fn create_course(&self, request: NewCourse) -> RehlaResult<String> {
        debug!("Creating course: {}", request.title);
        request.validate_request()?;
        for image in [&request.cover, &request.teacher_img].into_iter().flatten() {
            image.check(IMAGE_TYPES)?;
        }

        let folder_id = self.video_host.create_folder(&request.title).await?;

        let course = Course {
            id: String::new(),
            title: request.title,
            description: request.description,
            teacher: request.teacher,
            price: request.price,
            folder_id: folder_id.unwrap_or_default(),
            active: request.active,
            free: request.free,
            ..Course::default()
        };
        let course_id = self.course_repository.create(&course).await?;

        let stored = match self
            .image_updates(&course_id, request.cover, request.teacher_img)
            .await
        {
            Ok(updates) if updates.is_empty() => Ok(()),
            Ok(updates) => self.course_repository.update(&course_id, &updates).await,
            Err(e) => Err(e),
        };
        if let Err(e) = stored {
            self.remove_partial_course(&course_id).await;
            return Err(e);
        }

        self.cache().invalidate(&CacheKey::course(&course_id)).await;
        info!("Course created: {}", course_id);
        Ok(course_id)
    }

    async fn update_course(&self, course_id: &str, request: CourseUpdate) -> RehlaResult<()> {
        debug!("Updating course: {}", course_id);
        if self.course_repository.find_by_id(course_id).await?.is_none() {
            return Err(RehlaError::not_found("Course", course_id));
        }
        if request.patch.price.is_some_and(|p| p < 0) {
            return Err(RehlaError::validation("price can't be negative"));
        }

        let mut updates: FieldUpdates = request.patch.into();
        let images = self
            .image_updates(course_id, request.cover, request.teacher_img)
            .await?;
        for update in images {
            updates = updates.set(&update.path, update.value);
        }
        if updates.is_empty() {
            return Ok(());
        }

        self.course_repository.update(course_id, &updates).await?;
        self.cache().invalidate(&CacheKey::course(course_id)).await;
        info!("Course updated: {}", course_id);
        Ok(())
    }

    async fn delete_course(&self, course_id: &str) -> RehlaResult<()> {
        debug!("Deleting course: {}", course_id);
        let lectures = self.lecture_repository.find_all(course_id).await?;
        let exams = self.exam_repository.find_all(course_id).await?;

        if !self.course_repository.delete(course_id).await? {
            return Err(RehlaError::not_found("Course", course_id));
        }

        let cache = self.cache();
        cache.invalidate(&CacheKey::course(course_id)).await;
        for lecture in &lectures {
            cache.invalidate(&CacheKey::lecture(course_id, &lecture.id)).await;
        }
        for exam in &exams {
            cache.invalidate(&CacheKey::exam(course_id, &exam.id)).await;
        }
        cache.invalidate(&CacheKey::lectures(course_id)).await;
        cache.invalidate(&CacheKey::exams(course_id)).await;
        cache.invalidate(&CacheKey::materials(course_id)).await;

        self.remove_course_files(course_id).await;
        for lecture in &lectures {
            if let Err(e) = self.video_host.delete_video(&lecture.video_url).await {
                warn!("Failed to delete video of lecture {}: {}", lecture.id, e);
            }
        }

        info!("Course deleted: {}", course_id);
        Ok(())
    }
}

impl std::fmt::Debug for CourseServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseServiceImpl").finish_non_exhaustive()
    }
}

/// Lecture service backed by the lecture repository and the cache.
#[derive(Component)]
#[shaku(interface = LectureService)]
pub struct LectureServiceImpl {
    #[shaku(inject)]
    course_repository: Arc<dyn CourseRepository>,
    #[shaku(inject)]
    lecture_repository: Arc<dyn LectureRepository>,
    #[shaku(inject)]
    video_host: Arc<dyn VideoHost>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl LectureServiceImpl {
    /// Creates a new lecture service.
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        lecture_repository: Arc<dyn LectureRepository>,
        video_host: Arc<dyn VideoHost>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            course_repository,
            lecture_repository,
            video_host,
            cache,
        }
    }

    fn cache(&self) -> CacheAside<'_> {
        CacheAside::new(self.cache.as_ref())
    }
}

#[async_trait]
impl LectureService for LectureServiceImpl {
    async fn get_lecture(&self, course_id: &str, lecture_id: &str) -> RehlaResult<Lecture> {
        debug!("Getting lecture: {}/{}", course_id, lecture_id);
        let repository = &self.lecture_repository;
        self.cache()
            .read_through(&CacheKey::lecture(course_id, lecture_id), || async move {
                repository
                    .find_by_id(course_id, lecture_id)
                    .await?
                    .ok_or_else(|| RehlaError::not_found("Lecture", lecture_id))
            })
            .await
    }

    async fn list_lectures(&self, course_id: &str) -> RehlaResult<Vec<Lecture>> {
        let repository = &self.lecture_repository;
        self.cache()
            .read_through(&CacheKey::lectures(course_id), || async move {
                repository.find_all(course_id).await
            })
            .await
    }

    async fn create_lecture(&self, course_id: &str, request: NewLecture) -> RehlaResult<String> {
        debug!("Creating lecture in {}: {}", course_id, request.title);
        request.validate_request()?;
        if self.course_repository.find_by_id(course_id).await?.is_none() {
            return Err(RehlaError::not_found("Course", course_id));
        }

        let lecture = Lecture {
            id: String::new(),
            course_id: course_id.to_string(),
            title: request.title,
            description: request.description,
            order: request.order,
            video_url: request.video_url,
            free: request.free,
        };
        let lecture_id = self.lecture_repository.create(course_id, &lecture).await?;

        self.cache()
            .invalidate(&CacheKey::lecture(course_id, &lecture_id))
            .await;
        info!("Lecture created: {}/{}", course_id, lecture_id);
        Ok(lecture_id)
    }

    async fn update_lecture(&self, course_id: &str, lecture_id: &str, patch: LecturePatch) -> RehlaResult<()> {
        debug!("Updating lecture: {}/{}", course_id, lecture_id);
        if let Some(order) = patch.order {
            positive_order(order).map_err(|_| RehlaError::validation("order must be 1 or more"))?;
        }
        let updates: FieldUpdates = patch.into();
        if updates.is_empty() {
            return Ok(());
        }

        self.lecture_repository
            .update(course_id, lecture_id, &updates)
            .await?;
        self.cache()
            .invalidate(&CacheKey::lecture(course_id, lecture_id))
            .await;
        info!("Lecture updated: {}/{}", course_id, lecture_id);
        Ok(())
    }

    async fn delete_lecture(&self, course_id: &str, lecture_id: &str) -> RehlaResult<()> {
        debug!("Deleting lecture: {}/{}", course_id, lecture_id);
        let lecture = self
            .lecture_repository
            .find_by_id(course_id, lecture_id)
            .await?
            .ok_or_else(|| RehlaError::not_found("Lecture", lecture_id))?;

        self.video_host.delete_video(&lecture.video_url).await?;
        self.lecture_repository.delete(course_id, lecture_id).await?;

        self.cache()
            .invalidate(&CacheKey::lecture(course_id, lecture_id))
            .await;
        info!("Lecture deleted: {}/{}", course_id, lecture_id);
        Ok(())
    }
}

impl std::fmt::Debug for LectureServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LectureServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingStorage, Fixture};

    fn course_service(fx: &Fixture) -> CourseServiceImpl {
        course_service_with_storage(fx, fx.storage.clone())
    }

    fn course_service_with_storage(fx: &Fixture, storage: Arc<dyn ObjectStorage>) -> CourseServiceImpl {
        CourseServiceImpl::new(
            fx.courses(),
            fx.lectures(),
            fx.exams(),
            storage,
            fx.video.clone(),
            fx.cache.clone(),
        )
    }

    fn lecture_service(fx: &Fixture) -> LectureServiceImpl {
        LectureServiceImpl::new(fx.courses(), fx.lectures(), fx.video.clone(), fx.cache.clone())
    }

    fn new_course(title: &str) -> NewCourse {
        NewCourse {
            title: title.to_string(),
            teacher: "Ahmed".to_string(),
            price: 25_000,
            active: true,
            ..NewCourse::default()
        }
    }

    fn new_lecture(order: i64) -> NewLecture {
        NewLecture {
            title: format!("Lecture {}", order),
            order,
            video_url: format!("vid{}", order),
            ..NewLecture::default()
        }
    }

    #[tokio::test]
    async fn test_create_course_creates_video_folder() {
        let fx = Fixture::new();
        let service = course_service(&fx);

        let id = service.create_course(new_course("Algebra I")).await.unwrap();
        let course = service.get_course(&id).await.unwrap();

        assert_eq!(course.title, "Algebra I");
        assert_eq!(course.folder_id, "folder-1");
        assert_eq!(fx.video.folders.lock().as_slice(), ["Algebra I".to_string()]);
    }

    #[tokio::test]
    async fn test_create_course_rejects_blank_title() {
        let fx = Fixture::new();
        let result = course_service(&fx).create_course(new_course("  ")).await;
        assert!(matches!(result, Err(RehlaError::Validation(_))));
        assert!(fx.video.folders.lock().is_empty());
    }

    #[tokio::test]
    async fn test_course_images_are_uploaded() {
        let fx = Fixture::new();
        let service = course_service(&fx);
        let request = NewCourse {
            cover: Some(Upload::new("cover.png", b"\x89PNG\r\n\x1a\nxxxx".to_vec())),
            ..new_course("Physics")
        };

        let id = service.create_course(request).await.unwrap();
        let course = service.get_course(&id).await.unwrap();
        assert_eq!(course.cover_path, format!("courses/{}/cover", id));
        assert!(course.cover.ends_with(&course.cover_path));
        assert!(fx.storage.contains(&course.cover_path));
    }

    #[tokio::test]
    async fn test_reads_are_served_from_cache_until_invalidated() {
        let fx = Fixture::new();
        let service = course_service(&fx);
        let id = service.create_course(new_course("Algebra I")).await.unwrap();

        assert_eq!(service.list_courses().await.unwrap().len(), 1);
        assert!(fx.cache.get_raw("courses").await.unwrap().is_some());

        service
            .update_course(
                &id,
                CourseUpdate {
                    patch: rehla_core::CoursePatch {
                        title: Some("Algebra II".to_string()),
                        ..Default::default()
                    },
                    ..CourseUpdate::default()
                },
            )
            .await
            .unwrap();

        assert!(fx.cache.get_raw("courses").await.unwrap().is_none());
        assert!(fx.cache.get_raw(&format!("course:{}", id)).await.unwrap().is_none());
        assert_eq!(service.get_course(&id).await.unwrap().title, "Algebra II");
    }

    #[tokio::test]
    async fn test_missing_course_is_not_found() {
        let fx = Fixture::new();
        let result = course_service(&fx).get_course("nope").await;
        assert!(matches!(result, Err(RehlaError::NotFound { .. })));
        assert!(fx.cache.is_empty());
    }

    #[tokio::test]
    async fn test_overview_orders_lectures() {
        let fx = Fixture::new();
        let courses = course_service(&fx);
        let lectures = lecture_service(&fx);
        let id = courses.create_course(new_course("Algebra I")).await.unwrap();
        for order in [3, 1, 2] {
            lectures.create_lecture(&id, new_lecture(order)).await.unwrap();
        }

        let overview = courses.get_overview(&id).await.unwrap();
        let orders: Vec<i64> = overview.lectures.iter().map(|l| l.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(overview.course.number_of_lecs, 3);
        assert!(overview.lectures.iter().all(|l| l.course_id == id));

        let cached = courses.get_overview(&id).await.unwrap();
        assert_eq!(cached, overview);
    }

    #[tokio::test]
    async fn test_delete_course_clears_cache_and_videos() {
        let fx = Fixture::new();
        let courses = course_service(&fx);
        let lectures = lecture_service(&fx);
        let id = courses.create_course(new_course("Algebra I")).await.unwrap();
        lectures.create_lecture(&id, new_lecture(1)).await.unwrap();
        courses.get_overview(&id).await.unwrap();
        courses.list_courses().await.unwrap();

        courses.delete_course(&id).await.unwrap();

        assert!(fx.cache.is_empty());
        assert_eq!(fx.video.deleted.lock().as_slice(), ["vid1".to_string()]);
        assert!(courses.list_courses().await.unwrap().is_empty());
        assert!(matches!(
            courses.delete_course(&id).await,
            Err(RehlaError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_course_clears_cache_when_file_cleanup_fails() {
        let fx = Fixture::new();
        let storage = Arc::new(FailingStorage::failing_lists());
        let courses = course_service_with_storage(&fx, storage);
        let id = courses.create_course(new_course("Algebra I")).await.unwrap();
        courses.get_course(&id).await.unwrap();
        assert_eq!(courses.list_courses().await.unwrap().len(), 1);

        courses.delete_course(&id).await.unwrap();

        assert!(courses.list_courses().await.unwrap().is_empty());
        assert!(matches!(
            courses.get_course(&id).await,
            Err(RehlaError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_image_upload_rolls_back_course() {
        let fx = Fixture::new();
        let courses = course_service_with_storage(&fx, Arc::new(FailingStorage::failing_uploads()));
        assert!(courses.list_courses().await.unwrap().is_empty());

        let request = NewCourse {
            cover: Some(Upload::new("cover.png", b"\x89PNG\r\n\x1a\nxxxx".to_vec())),
            ..new_course("Physics")
        };
        let result = courses.create_course(request).await;

        assert!(matches!(result, Err(RehlaError::Storage(_))));
        assert!(fx.courses().find_all().await.unwrap().is_empty());
        assert!(courses.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lecture_write_invalidates_list() {
        let fx = Fixture::new();
        let courses = course_service(&fx);
        let lectures = lecture_service(&fx);
        let id = courses.create_course(new_course("Algebra I")).await.unwrap();
        let lecture_id = lectures.create_lecture(&id, new_lecture(1)).await.unwrap();

        assert_eq!(lectures.list_lectures(&id).await.unwrap().len(), 1);
        lectures.get_lecture(&id, &lecture_id).await.unwrap();

        lectures
            .update_lecture(
                &id,
                &lecture_id,
                LecturePatch {
                    title: Some("Renamed".to_string()),
                    ..LecturePatch::default()
                },
            )
            .await
            .unwrap();

        assert!(fx.cache.get_raw(&format!("course:{}:lecs", id)).await.unwrap().is_none());
        let lecture = lectures.get_lecture(&id, &lecture_id).await.unwrap();
        assert_eq!(lecture.title, "Renamed");
        assert_eq!(lecture.course_id, id);
    }

    #[tokio::test]
    async fn test_lecture_rejects_non_positive_order() {
        let fx = Fixture::new();
        let lectures = lecture_service(&fx);
        let result = lectures
            .update_lecture(
                "c1",
                "l1",
                LecturePatch {
                    order: Some(0),
                    ..LecturePatch::default()
                },
            )
            .await;
        assert!(matches!(result, Err(RehlaError::Validation(_))));
    }
}
