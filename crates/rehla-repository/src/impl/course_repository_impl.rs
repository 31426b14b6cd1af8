//! Course catalogue repositories: courses and their lectures, exams and materials.

use super::codec::{decode, decode_all, encode};
use crate::dao::{paths, DocumentStore};
use crate::traits::{CourseRepository, ExamRepository, LectureRepository, MaterialRepository};
use async_trait::async_trait;
use rehla_core::{Course, Exam, FieldUpdates, Lecture, Material, RehlaResult};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Course repository backed by the document store.
#[derive(Component)]
#[shaku(interface = CourseRepository)]
pub struct CourseRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl CourseRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CourseRepository for CourseRepositoryImpl {
    async fn find_by_id(&self, course_id: &str) -> RehlaResult<Option<Course>> {
        debug!("Repository: find course {}", course_id);
        match self.store.get(&paths::course(course_id)).await? {
            Some(document) => Ok(Some(decode(course_id, document)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> RehlaResult<Vec<Course>> {
        debug!("Repository: list courses");
        decode_all(self.store.list(&paths::courses()).await?)
    }

    async fn create(&self, course: &Course) -> RehlaResult<String> {
        self.store.create(&paths::courses(), encode(course)?).await
    }

    async fn update(&self, course_id: &str, updates: &FieldUpdates) -> RehlaResult<()> {
        self.store.update(&paths::course(course_id), updates).await
    }

    async fn delete(&self, course_id: &str) -> RehlaResult<bool> {
        for collection in [
            paths::lectures(course_id),
            paths::exams(course_id),
            paths::materials(course_id),
        ] {
            for (id, _) in self.store.list(&collection).await? {
                self.store.delete(&collection.doc(&id)).await?;
            }
        }
        self.store.delete(&paths::course(course_id)).await
    }
}

/// Lecture repository backed by the document store.
#[derive(Component)]
#[shaku(interface = LectureRepository)]
pub struct LectureRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl LectureRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LectureRepository for LectureRepositoryImpl {
    async fn find_by_id(&self, course_id: &str, lecture_id: &str) -> RehlaResult<Option<Lecture>> {
        let path = paths::lectures(course_id).doc(lecture_id);
        match self.store.get(&path).await? {
            Some(document) => {
                let mut lecture: Lecture = decode(lecture_id, document)?;
                lecture.course_id = course_id.to_string();
                Ok(Some(lecture))
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self, course_id: &str) -> RehlaResult<Vec<Lecture>> {
        let mut lectures: Vec<Lecture> = decode_all(self.store.list(&paths::lectures(course_id)).await?)?;
        for lecture in &mut lectures {
            lecture.course_id = course_id.to_string();
        }
        lectures.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Ok(lectures)
    }

    async fn create(&self, course_id: &str, lecture: &Lecture) -> RehlaResult<String> {
        self.store.create(&paths::lectures(course_id), encode(lecture)?).await
    }

    async fn update(&self, course_id: &str, lecture_id: &str, updates: &FieldUpdates) -> RehlaResult<()> {
        self.store
            .update(&paths::lectures(course_id).doc(lecture_id), updates)
            .await
    }

    async fn delete(&self, course_id: &str, lecture_id: &str) -> RehlaResult<bool> {
        self.store.delete(&paths::lectures(course_id).doc(lecture_id)).await
    }
}

/// Exam repository backed by the document store.
#[derive(Component)]
#[shaku(interface = ExamRepository)]
pub struct ExamRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl ExamRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ExamRepository for ExamRepositoryImpl {
    async fn find_by_id(&self, course_id: &str, exam_id: &str) -> RehlaResult<Option<Exam>> {
        match self.store.get(&paths::exams(course_id).doc(exam_id)).await? {
            Some(document) => {
                let mut exam: Exam = decode(exam_id, document)?;
                exam.course_id = course_id.to_string();
                Ok(Some(exam))
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self, course_id: &str) -> RehlaResult<Vec<Exam>> {
        let mut exams: Vec<Exam> = decode_all(self.store.list(&paths::exams(course_id)).await?)?;
        for exam in &mut exams {
            exam.course_id = course_id.to_string();
        }
        exams.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Ok(exams)
    }

    async fn create(&self, course_id: &str, exam: &Exam) -> RehlaResult<String> {
        self.store.create(&paths::exams(course_id), encode(exam)?).await
    }

    async fn update(&self, course_id: &str, exam_id: &str, updates: &FieldUpdates) -> RehlaResult<()> {
        self.store.update(&paths::exams(course_id).doc(exam_id), updates).await
    }

    async fn delete(&self, course_id: &str, exam_id: &str) -> RehlaResult<bool> {
        self.store.delete(&paths::exams(course_id).doc(exam_id)).await
    }
}

/// Material repository backed by the document store.
#[derive(Component)]
#[shaku(interface = MaterialRepository)]
pub struct MaterialRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl MaterialRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MaterialRepository for MaterialRepositoryImpl {
    async fn find_by_id(&self, course_id: &str, material_id: &str) -> RehlaResult<Option<Material>> {
        match self.store.get(&paths::materials(course_id).doc(material_id)).await? {
            Some(document) => {
                let mut material: Material = decode(material_id, document)?;
                material.course_id = course_id.to_string();
                Ok(Some(material))
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self, course_id: &str) -> RehlaResult<Vec<Material>> {
        let mut materials: Vec<Material> =
            decode_all(self.store.list(&paths::materials(course_id)).await?)?;
        for material in &mut materials {
            material.course_id = course_id.to_string();
        }
        materials.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Ok(materials)
    }

    async fn create(&self, course_id: &str, material: &Material) -> RehlaResult<String> {
        self.store.create(&paths::materials(course_id), encode(material)?).await
    }

    async fn update(&self, course_id: &str, material_id: &str, updates: &FieldUpdates) -> RehlaResult<()> {
        self.store
            .update(&paths::materials(course_id).doc(material_id), updates)
            .await
    }

    async fn delete(&self, course_id: &str, material_id: &str) -> RehlaResult<bool> {
        self.store.delete(&paths::materials(course_id).doc(material_id)).await
    }
}
