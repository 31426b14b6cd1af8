//! Answer submission and correction service trait.

use crate::dto::Upload;
use async_trait::async_trait;
use rehla_core::{Answer, AnswerCorrection, ExamAnswers, Interface, RehlaResult, SubmittedAnswer};

/// Answer service trait.
#[async_trait]
pub trait AnswerService: Interface + Send + Sync {
    /// Stores a subscriber's answer sheet for an exam, replacing any earlier one.
    async fn submit_answer(&self, user_id: &str, course_id: &str, exam_id: &str, file: Upload) -> RehlaResult<()>;

    /// Lists a subscriber's answers within a course.
    async fn list_answers(&self, user_id: &str, course_id: &str) -> RehlaResult<Vec<Answer>>;

    /// Gets a subscriber's answer with its download URL.
    async fn get_answer(&self, user_id: &str, course_id: &str, exam_id: &str) -> RehlaResult<Answer>;

    /// Lists every answer to an exam, split by grading state.
    async fn answers_for_exam(&self, course_id: &str, exam_id: &str) -> RehlaResult<ExamAnswers>;

    /// Gets one submitted answer with its download URL, for grading.
    async fn get_submission(&self, course_id: &str, exam_id: &str, user_id: &str) -> RehlaResult<SubmittedAnswer>;

    /// Grades an answer.
    async fn correct_answer(
        &self,
        course_id: &str,
        exam_id: &str,
        user_id: &str,
        correction: AnswerCorrection,
    ) -> RehlaResult<()>;
}
