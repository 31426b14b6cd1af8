//! Course content DTOs.

use super::Upload;
use rehla_core::rules::not_blank;
use rehla_core::{CoursePatch, ExamPatch, MaterialPatch};
use serde::Deserialize;
use validator::Validate;

/// Request to create a course.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewCourse {
    #[validate(custom(function = "not_blank", message = "title shouldn't be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub teacher: String,
    #[validate(range(min = 0, message = "price can't be negative"))]
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub free: bool,
    #[serde(skip)]
    pub cover: Option<Upload>,
    #[serde(skip)]
    pub teacher_img: Option<Upload>,
}

/// Request to update a course, optionally replacing its images.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub patch: CoursePatch,
    pub cover: Option<Upload>,
    pub teacher_img: Option<Upload>,
}

/// Request to add a lecture.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewLecture {
    #[validate(custom(function = "not_blank", message = "title shouldn't be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1, message = "order must be 1 or more"))]
    pub order: i64,
    /// Hashed id of the media on the video host.
    #[validate(custom(function = "not_blank", message = "video_url shouldn't be empty"))]
    pub video_url: String,
    #[serde(default)]
    pub free: bool,
}

/// Request to add an exam with its PDF sheet.
#[derive(Debug, Clone, Validate)]
pub struct NewExam {
    #[validate(custom(function = "not_blank", message = "title shouldn't be empty"))]
    pub title: String,
    #[validate(range(min = 1, message = "order must be 1 or more"))]
    pub order: i64,
    pub file: Upload,
}

/// Request to update an exam, optionally replacing its sheet.
#[derive(Debug, Clone, Default)]
pub struct ExamUpdate {
    pub patch: ExamPatch,
    pub file: Option<Upload>,
}

/// Request to add a material with its file.
#[derive(Debug, Clone, Validate)]
pub struct NewMaterial {
    #[validate(custom(function = "not_blank", message = "title shouldn't be empty"))]
    pub title: String,
    #[validate(range(min = 1, message = "order must be 1 or more"))]
    pub order: i64,
    pub free: bool,
    pub file: Upload,
}

/// Request to update a material, optionally replacing its file.
#[derive(Debug, Clone, Default)]
pub struct MaterialUpdate {
    pub patch: MaterialPatch,
    pub file: Option<Upload>,
}
