//! Course content service traits.

use crate::dto::{CourseUpdate, ExamUpdate, MaterialUpdate, NewCourse, NewExam, NewLecture, NewMaterial};
use async_trait::async_trait;
use rehla_core::{Course, CourseOverview, Exam, Interface, Lecture, LecturePatch, Material, RehlaResult};

/// Course service trait.
#[async_trait]
pub trait CourseService: Interface + Send + Sync {
    /// Gets a course.
    async fn get_course(&self, course_id: &str) -> RehlaResult<Course>;

    /// Lists every course.
    async fn list_courses(&self) -> RehlaResult<Vec<Course>>;

    /// Lists the courses open to subscribers.
    async fn list_active_courses(&self) -> RehlaResult<Vec<Course>>;

    /// Gets a course with its lectures and exams.
    async fn get_overview(&self, course_id: &str) -> RehlaResult<CourseOverview>;

    /// Creates a course and returns its id.
    async fn create_course(&self, request: NewCourse) -> RehlaResult<String>;

    /// Updates a course.
    async fn update_course(&self, course_id: &str, request: CourseUpdate) -> RehlaResult<()>;

    /// Deletes a course with its content.
    async fn delete_course(&self, course_id: &str) -> RehlaResult<()>;
}

/// Lecture service trait.
#[async_trait]
pub trait LectureService: Interface + Send + Sync {
    /// Gets a lecture.
    async fn get_lecture(&self, course_id: &str, lecture_id: &str) -> RehlaResult<Lecture>;

    /// Lists the lectures of a course in order.
    async fn list_lectures(&self, course_id: &str) -> RehlaResult<Vec<Lecture>>;

    /// Adds a lecture and returns its id.
    async fn create_lecture(&self, course_id: &str, request: NewLecture) -> RehlaResult<String>;

    /// Updates a lecture.
    async fn update_lecture(&self, course_id: &str, lecture_id: &str, patch: LecturePatch) -> RehlaResult<()>;

    /// Deletes a lecture.
    async fn delete_lecture(&self, course_id: &str, lecture_id: &str) -> RehlaResult<()>;
}

/// Exam service trait. Returned exams carry a fresh download URL.
#[async_trait]
pub trait ExamService: Interface + Send + Sync {
    /// Gets an exam with its download URL.
    async fn get_exam(&self, course_id: &str, exam_id: &str) -> RehlaResult<Exam>;

    /// Lists the exams of a course in order.
    async fn list_exams(&self, course_id: &str) -> RehlaResult<Vec<Exam>>;

    /// Adds an exam with its sheet and returns its id.
    async fn create_exam(&self, course_id: &str, request: NewExam) -> RehlaResult<String>;

    /// Updates an exam.
    async fn update_exam(&self, course_id: &str, exam_id: &str, request: ExamUpdate) -> RehlaResult<()>;

    /// Deletes an exam and its sheet.
    async fn delete_exam(&self, course_id: &str, exam_id: &str) -> RehlaResult<()>;
}

/// Material service trait. Returned materials carry a fresh download URL.
#[async_trait]
pub trait MaterialService: Interface + Send + Sync {
    /// Lists the materials of a course in order.
    async fn list_materials(&self, course_id: &str) -> RehlaResult<Vec<Material>>;

    /// Lists free materials of every active course.
    async fn list_free_materials(&self) -> RehlaResult<Vec<Material>>;

    /// Gets a material.
    async fn get_material(&self, course_id: &str, material_id: &str) -> RehlaResult<Material>;

    /// Adds a material with its file and returns its id.
    async fn create_material(&self, course_id: &str, request: NewMaterial) -> RehlaResult<String>;

    /// Updates a material.
    async fn update_material(&self, course_id: &str, material_id: &str, request: MaterialUpdate) -> RehlaResult<()>;

    /// Deletes a material and its file.
    async fn delete_material(&self, course_id: &str, material_id: &str) -> RehlaResult<()>;
}
