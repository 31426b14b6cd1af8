//! Course, lecture, exam and material entities.

use crate::patch::FieldUpdates;
use serde::{Deserialize, Serialize};

/// A course offered on the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub teacher: String,
    /// Public URL of the teacher photo.
    #[serde(default)]
    pub teacher_img: String,
    /// Object storage path of the teacher photo.
    #[serde(default)]
    pub file_path: String,
    /// Public URL of the cover image.
    #[serde(default)]
    pub cover: String,
    /// Object storage path of the cover image.
    #[serde(default)]
    pub cover_path: String,
    #[serde(default)]
    pub price: i64,
    /// Video host project holding the lecture videos.
    #[serde(default)]
    pub folder_id: String,
    #[serde(default)]
    pub number_of_lecs: i64,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub free: bool,
}

/// A video lecture inside a course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    #[serde(default)]
    pub id: String,
    #[serde(skip)]
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order: i64,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub free: bool,
}

impl Lecture {
    /// Lectures after the first three need an active subscription.
    pub const FREE_PREVIEW_COUNT: i64 = 3;

    /// Returns true when the lecture can be watched without a subscription.
    #[must_use]
    pub const fn is_preview(&self) -> bool {
        self.free || self.order <= Self::FREE_PREVIEW_COUNT
    }
}

/// An exam sheet inside a course. The PDF lives in object storage at
/// `courses/{course_id}/exams/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(default)]
    pub id: String,
    #[serde(skip)]
    pub course_id: String,
    pub title: String,
    pub order: i64,
    /// Signed download URL, attached after every read.
    #[serde(skip)]
    pub url: String,
}

impl Exam {
    /// Object storage path of the exam sheet.
    #[must_use]
    pub fn storage_path(course_id: &str, exam_id: &str) -> String {
        format!("courses/{}/exams/{}", course_id, exam_id)
    }
}

/// A downloadable material (notes, summaries) inside a course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub id: String,
    #[serde(skip)]
    pub course_id: String,
    pub title: String,
    pub order: i64,
    #[serde(default)]
    pub free: bool,
    /// Signed download URL, attached after every read.
    #[serde(skip)]
    pub url: String,
}

impl Material {
    /// Object storage path of the material file.
    #[must_use]
    pub fn storage_path(course_id: &str, material_id: &str) -> String {
        format!("courses/{}/materials/{}", course_id, material_id)
    }
}

/// A course together with its lectures and exams, ordered by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOverview {
    pub course: Course,
    pub lectures: Vec<Lecture>,
    pub exams: Vec<Exam>,
}

/// Partial update of a course.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub teacher: Option<String>,
    pub teacher_img: Option<String>,
    pub file_path: Option<String>,
    pub cover: Option<String>,
    pub cover_path: Option<String>,
    pub price: Option<i64>,
    pub folder_id: Option<String>,
    pub number_of_lecs: Option<i64>,
    pub active: Option<bool>,
    pub free: Option<bool>,
}

impl From<CoursePatch> for FieldUpdates {
    fn from(patch: CoursePatch) -> Self {
        FieldUpdates::new()
            .set_opt("title", patch.title)
            .set_opt("description", patch.description)
            .set_opt("teacher", patch.teacher)
            .set_opt("teacher_img", patch.teacher_img)
            .set_opt("file_path", patch.file_path)
            .set_opt("cover", patch.cover)
            .set_opt("cover_path", patch.cover_path)
            .set_opt("price", patch.price)
            .set_opt("folder_id", patch.folder_id)
            .set_opt("number_of_lecs", patch.number_of_lecs)
            .set_opt("active", patch.active)
            .set_opt("free", patch.free)
    }
}

/// Partial update of a lecture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LecturePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
    pub video_url: Option<String>,
    pub free: Option<bool>,
}

impl From<LecturePatch> for FieldUpdates {
    fn from(patch: LecturePatch) -> Self {
        FieldUpdates::new()
            .set_opt("title", patch.title)
            .set_opt("description", patch.description)
            .set_opt("order", patch.order)
            .set_opt("video_url", patch.video_url)
            .set_opt("free", patch.free)
    }
}

/// Partial update of an exam. A replacement PDF travels separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamPatch {
    pub title: Option<String>,
    pub order: Option<i64>,
}

impl From<ExamPatch> for FieldUpdates {
    fn from(patch: ExamPatch) -> Self {
        FieldUpdates::new()
            .set_opt("title", patch.title)
            .set_opt("order", patch.order)
    }
}

/// Partial update of a material. A replacement file travels separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialPatch {
    pub title: Option<String>,
    pub order: Option<i64>,
    pub free: Option<bool>,
}

impl From<MaterialPatch> for FieldUpdates {
    fn from(patch: MaterialPatch) -> Self {
        FieldUpdates::new()
            .set_opt("title", patch.title)
            .set_opt("order", patch.order)
            .set_opt("free", patch.free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_child_entities_do_not_serialize_parent_or_url() {
        let exam = Exam {
            id: "e1".to_string(),
            course_id: "c1".to_string(),
            title: "Midterm".to_string(),
            order: 1,
            url: "https://signed".to_string(),
        };
        let value = serde_json::to_value(&exam).unwrap();
        assert!(value.get("course_id").is_none());
        assert!(value.get("url").is_none());
        assert_eq!(value["title"], json!("Midterm"));
    }

    #[test]
    fn test_lecture_preview() {
        let mut lec = Lecture {
            order: 3,
            ..Lecture::default()
        };
        assert!(lec.is_preview());
        lec.order = 4;
        assert!(!lec.is_preview());
        lec.free = true;
        assert!(lec.is_preview());
    }

    #[test]
    fn test_course_patch_only_named_fields() {
        let patch = CoursePatch {
            title: Some("Algebra II".to_string()),
            active: Some(false),
            ..CoursePatch::default()
        };
        let updates: FieldUpdates = patch.into();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates.get("title"), Some(&json!("Algebra II")));
        assert_eq!(updates.get("active"), Some(&json!(false)));
    }

    #[test]
    fn test_course_decodes_with_missing_optional_fields() {
        let course: Course = serde_json::from_value(json!({"title": "Physics"})).unwrap();
        assert_eq!(course.title, "Physics");
        assert_eq!(course.price, 0);
        assert!(!course.active);
    }
}
