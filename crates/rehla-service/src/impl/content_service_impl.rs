//! Exam and material service implementations.
//!
//! Both own a file in object storage next to their document. Download URLs
//! are signed per read and never cached.

use crate::cache::{CacheAside, CacheInterface, CacheKey};
use crate::course_service::{ExamService, MaterialService};
use crate::dto::{ExamUpdate, MaterialUpdate, NewExam, NewMaterial, DOCUMENT_TYPES};
use async_trait::async_trait;
use rehla_core::rules::positive_order;
use rehla_core::{Exam, FieldUpdates, Material, RehlaError, RehlaResult, ValidateExt};
use rehla_repository::{CourseRepository, ExamRepository, MaterialRepository, ObjectStorage};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

fn check_order(order: Option<i64>) -> RehlaResult<()> {
    match order {
        Some(order) => positive_order(order)
            .map_err(|_| RehlaError::validation("order must be 1 or more")),
        None => Ok(()),
    }
}

/// Exam service backed by the exam repository, object storage and the cache.
#[derive(Component)]
#[shaku(interface = ExamService)]
pub struct ExamServiceImpl {
    #[shaku(inject)]
    course_repository: Arc<dyn CourseRepository>,
    #[shaku(inject)]
    exam_repository: Arc<dyn ExamRepository>,
    #[shaku(inject)]
    storage: Arc<dyn ObjectStorage>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl ExamServiceImpl {
    /// Creates a new exam service.
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        exam_repository: Arc<dyn ExamRepository>,
        storage: Arc<dyn ObjectStorage>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            course_repository,
            exam_repository,
            storage,
            cache,
        }
    }

    fn cache(&self) -> CacheAside<'_> {
        CacheAside::new(self.cache.as_ref())
    }
}

#[async_trait]
impl ExamService for ExamServiceImpl {
    async fn get_exam(&self, course_id: &str, exam_id: &str) -> RehlaResult<Exam> {
        debug!("Getting exam: {}/{}", course_id, exam_id);
        let repository = &self.exam_repository;
        let mut exam = self
            .cache()
            .read_through(&CacheKey::exam(course_id, exam_id), || async move {
                repository
                    .find_by_id(course_id, exam_id)
                    .await?
                    .ok_or_else(|| RehlaError::not_found("Exam", exam_id))
            })
            .await?;

        exam.url = self
            .storage
            .download_url(&Exam::storage_path(course_id, exam_id))
            .await?;
        Ok(exam)
    }

    async fn list_exams(&self, course_id: &str) -> RehlaResult<Vec<Exam>> {
        let repository = &self.exam_repository;
        self.cache()
            .read_through(&CacheKey::exams(course_id), || async move {
                repository.find_all(course_id).await
            })
            .await
    }

    async fn create_exam(&self, course_id: &str, request: NewExam) -> RehlaResult<String> {
        debug!("Creating exam in {}: {}", course_id, request.title);
        request.validate_request()?;
        let content_type = request.file.check(DOCUMENT_TYPES)?;
        if self.course_repository.find_by_id(course_id).await?.is_none() {
            return Err(RehlaError::not_found("Course", course_id));
        }

        let exam = Exam {
            id: String::new(),
            course_id: course_id.to_string(),
            title: request.title,
            order: request.order,
            url: String::new(),
        };
        let exam_id = self.exam_repository.create(course_id, &exam).await?;

        let path = Exam::storage_path(course_id, &exam_id);
        if let Err(e) = self.storage.upload(&path, request.file.bytes, content_type).await {
            warn!("Sheet upload failed, removing exam {}: {}", exam_id, e);
            self.exam_repository.delete(course_id, &exam_id).await?;
            return Err(e);
        }

        self.cache().invalidate(&CacheKey::exam(course_id, &exam_id)).await;
        info!("Exam created: {}/{}", course_id, exam_id);
        Ok(exam_id)
    }

    async fn update_exam(&self, course_id: &str, exam_id: &str, request: ExamUpdate) -> RehlaResult<()> {
        debug!("Updating exam: {}/{}", course_id, exam_id);
        check_order(request.patch.order)?;
        let content_type = request.file.as_ref().map(|f| f.check(DOCUMENT_TYPES)).transpose()?;
        if self.exam_repository.find_by_id(course_id, exam_id).await?.is_none() {
            return Err(RehlaError::not_found("Exam", exam_id));
        }

        if let (Some(file), Some(content_type)) = (request.file, content_type) {
            self.storage
                .upload(&Exam::storage_path(course_id, exam_id), file.bytes, content_type)
                .await?;
        }

        let updates: FieldUpdates = request.patch.into();
        if !updates.is_empty() {
            self.exam_repository.update(course_id, exam_id, &updates).await?;
        }

        self.cache().invalidate(&CacheKey::exam(course_id, exam_id)).await;
        info!("Exam updated: {}/{}", course_id, exam_id);
        Ok(())
    }

    async fn delete_exam(&self, course_id: &str, exam_id: &str) -> RehlaResult<()> {
        debug!("Deleting exam: {}/{}", course_id, exam_id);
        if self.exam_repository.find_by_id(course_id, exam_id).await?.is_none() {
            return Err(RehlaError::not_found("Exam", exam_id));
        }

        self.storage.delete(&Exam::storage_path(course_id, exam_id)).await?;
        self.exam_repository.delete(course_id, exam_id).await?;

        self.cache().invalidate(&CacheKey::exam(course_id, exam_id)).await;
        info!("Exam deleted: {}/{}", course_id, exam_id);
        Ok(())
    }
}

impl std::fmt::Debug for ExamServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExamServiceImpl").finish_non_exhaustive()
    }
}

/// Material service backed by the material repository, object storage and
/// the cache.
#[derive(Component)]
#[shaku(interface = MaterialService)]
pub struct MaterialServiceImpl {
    #[shaku(inject)]
    course_repository: Arc<dyn CourseRepository>,
    #[shaku(inject)]
    material_repository: Arc<dyn MaterialRepository>,
    #[shaku(inject)]
    storage: Arc<dyn ObjectStorage>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl MaterialServiceImpl {
    /// Creates a new material service.
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        material_repository: Arc<dyn MaterialRepository>,
        storage: Arc<dyn ObjectStorage>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            course_repository,
            material_repository,
            storage,
            cache,
        }
    }

    fn cache(&self) -> CacheAside<'_> {
        CacheAside::new(self.cache.as_ref())
    }

    async fn cached_materials(&self, course_id: &str) -> RehlaResult<Vec<Material>> {
        let repository = &self.material_repository;
        self.cache()
            .read_through(&CacheKey::materials(course_id), || async move {
                repository.find_all(course_id).await
            })
            .await
    }

    /// Signs download URLs. A missing file leaves the URL empty.
    async fn attach_urls(&self, materials: &mut [Material]) {
        for material in materials.iter_mut() {
            let path = Material::storage_path(&material.course_id, &material.id);
            match self.storage.download_url(&path).await {
                Ok(url) => material.url = url,
                Err(e) => warn!("No download URL for material {}: {}", material.id, e),
            }
        }
    }
}

#[async_trait]
impl MaterialService for MaterialServiceImpl {
    async fn list_materials(&self, course_id: &str) -> RehlaResult<Vec<Material>> {
        debug!("Listing materials of {}", course_id);
        let mut materials = self.cached_materials(course_id).await?;
        self.attach_urls(&mut materials).await;
        Ok(materials)
    }

    async fn list_free_materials(&self) -> RehlaResult<Vec<Material>> {
        let mut free = Vec::new();
        for course in self.course_repository.find_all().await? {
            if !course.active {
                continue;
            }
            let materials = self.cached_materials(&course.id).await?;
            free.extend(materials.into_iter().filter(|m| m.free));
        }
        self.attach_urls(&mut free).await;
        Ok(free)
    }

    async fn get_material(&self, course_id: &str, material_id: &str) -> RehlaResult<Material> {
        let mut material = self
            .material_repository
            .find_by_id(course_id, material_id)
            .await?
            .ok_or_else(|| RehlaError::not_found("Material", material_id))?;
        self.attach_urls(std::slice::from_mut(&mut material)).await;
        Ok(material)
    }

    async fn create_material(&self, course_id: &str, request: NewMaterial) -> RehlaResult<String> {
        debug!("Creating material in {}: {}", course_id, request.title);
        request.validate_request()?;
        let content_type = request.file.check(DOCUMENT_TYPES)?;
        if self.course_repository.find_by_id(course_id).await?.is_none() {
            return Err(RehlaError::not_found("Course", course_id));
        }

        let material = Material {
            id: String::new(),
            course_id: course_id.to_string(),
            title: request.title,
            order: request.order,
            free: request.free,
            url: String::new(),
        };
        let material_id = self.material_repository.create(course_id, &material).await?;

        let path = Material::storage_path(course_id, &material_id);
        if let Err(e) = self.storage.upload(&path, request.file.bytes, content_type).await {
            warn!("File upload failed, removing material {}: {}", material_id, e);
            self.material_repository.delete(course_id, &material_id).await?;
            return Err(e);
        }

        self.cache().invalidate(&CacheKey::materials(course_id)).await;
        info!("Material created: {}/{}", course_id, material_id);
        Ok(material_id)
    }

    async fn update_material(&self, course_id: &str, material_id: &str, request: MaterialUpdate) -> RehlaResult<()> {
        debug!("Updating material: {}/{}", course_id, material_id);
        check_order(request.patch.order)?;
        let content_type = request.file.as_ref().map(|f| f.check(DOCUMENT_TYPES)).transpose()?;
        if self
            .material_repository
            .find_by_id(course_id, material_id)
            .await?
            .is_none()
        {
            return Err(RehlaError::not_found("Material", material_id));
        }

        if let (Some(file), Some(content_type)) = (request.file, content_type) {
            self.storage
                .upload(&Material::storage_path(course_id, material_id), file.bytes, content_type)
                .await?;
        }

        let updates: FieldUpdates = request.patch.into();
        if !updates.is_empty() {
            self.material_repository
                .update(course_id, material_id, &updates)
                .await?;
        }

        self.cache().invalidate(&CacheKey::materials(course_id)).await;
        info!("Material updated: {}/{}", course_id, material_id);
        Ok(())
    }

    async fn delete_material(&self, course_id: &str, material_id: &str) -> RehlaResult<()> {
        debug!("Deleting material: {}/{}", course_id, material_id);
        if !self.material_repository.delete(course_id, material_id).await? {
            return Err(RehlaError::not_found("Material", material_id));
        }
        if let Err(e) = self
            .storage
            .delete(&Material::storage_path(course_id, material_id))
            .await
        {
            warn!("Failed to delete file of material {}: {}", material_id, e);
        }

        self.cache().invalidate(&CacheKey::materials(course_id)).await;
        info!("Material deleted: {}/{}", course_id, material_id);
        Ok(())
    }
}

impl std::fmt::Debug for MaterialServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialServiceImpl").finish_non_exhaustive()
    }
}
