//! Exam answers submitted by subscribers and graded by correctors.

use crate::patch::FieldUpdates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An answer sheet. The id is the exam id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub id: String,
    pub course_id: String,
    #[serde(default)]
    pub exam_title: String,
    pub storage_path: String,
    #[serde(default, rename = "mark")]
    pub grade: i64,
    #[serde(default)]
    pub out_of: i64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub corrected: bool,
    pub date_of_submission: DateTime<Utc>,
    /// Signed download URL, attached after reads.
    #[serde(skip)]
    pub url: String,
}

impl Answer {
    /// Object storage path of a submitted answer sheet.
    #[must_use]
    pub fn storage_path_for(course_id: &str, exam_id: &str, user_id: &str) -> String {
        format!("courses/{}/exams/{}/answers/{}", course_id, exam_id, user_id)
    }
}

/// An answer together with the subscriber who submitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedAnswer {
    pub user_id: String,
    pub user_name: String,
    pub answer: Answer,
}

/// Answers to one exam, split by grading state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExamAnswers {
    pub corrected: Vec<SubmittedAnswer>,
    pub uncorrected: Vec<SubmittedAnswer>,
}

/// A corrector's grading of an answer.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerCorrection {
    pub grade: i64,
    pub out_of: i64,
    #[serde(default)]
    pub notes: String,
}

impl From<AnswerCorrection> for FieldUpdates {
    fn from(correction: AnswerCorrection) -> Self {
        FieldUpdates::new()
            .set("mark", correction.grade)
            .set("out_of", correction.out_of)
            .set("notes", correction.notes)
            .set("corrected", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grade_is_stored_as_mark() {
        let answer = Answer {
            id: "e1".to_string(),
            course_id: "c1".to_string(),
            exam_title: "Quiz".to_string(),
            storage_path: Answer::storage_path_for("c1", "e1", "u1"),
            grade: 7,
            out_of: 10,
            notes: String::new(),
            corrected: true,
            date_of_submission: Utc::now(),
            url: String::new(),
        };
        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["mark"], json!(7));
        assert_eq!(value["storage_path"], json!("courses/c1/exams/e1/answers/u1"));
    }

    #[test]
    fn test_correction_marks_corrected() {
        let updates: FieldUpdates = AnswerCorrection {
            grade: 8,
            out_of: 10,
            notes: "good".to_string(),
        }
        .into();
        assert_eq!(updates.get("corrected"), Some(&json!(true)));
        assert_eq!(updates.get("mark"), Some(&json!(8)));
    }
}
