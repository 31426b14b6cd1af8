//! Answer service implementation.

use crate::answer_service::AnswerService;
use crate::cache::{CacheAside, CacheInterface, CacheKey};
use crate::dto::{Upload, ANSWER_TYPES};
use async_trait::async_trait;
use chrono::Utc;
use rehla_core::{
    Answer, AnswerCorrection, Exam, ExamAnswers, FieldUpdates, RehlaError, RehlaResult, SubmittedAnswer,
};
use rehla_repository::{AnswerRepository, ExamRepository, ObjectStorage, UserRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Answer service backed by the answer repository and object storage.
#[derive(Component)]
#[shaku(interface = AnswerService)]
pub struct AnswerServiceImpl {
    #[shaku(inject)]
    exam_repository: Arc<dyn ExamRepository>,
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    answer_repository: Arc<dyn AnswerRepository>,
    #[shaku(inject)]
    storage: Arc<dyn ObjectStorage>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl AnswerServiceImpl {
    /// Creates a new answer service.
    pub fn new(
        exam_repository: Arc<dyn ExamRepository>,
        user_repository: Arc<dyn UserRepository>,
        answer_repository: Arc<dyn AnswerRepository>,
        storage: Arc<dyn ObjectStorage>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            exam_repository,
            user_repository,
            answer_repository,
            storage,
            cache,
        }
    }

    async fn exam(&self, course_id: &str, exam_id: &str) -> RehlaResult<Exam> {
        let repository = &self.exam_repository;
        CacheAside::new(self.cache.as_ref())
            .read_through(&CacheKey::exam(course_id, exam_id), || async move {
                repository
                    .find_by_id(course_id, exam_id)
                    .await?
                    .ok_or_else(|| RehlaError::not_found("Exam", exam_id))
            })
            .await
    }

    async fn find(&self, user_id: &str, course_id: &str, exam_id: &str) -> RehlaResult<Answer> {
        let mut answer = self
            .answer_repository
            .find(user_id, course_id, exam_id)
            .await?
            .ok_or_else(|| RehlaError::not_found("Answer", exam_id))?;
        answer.url = self.storage.download_url(&answer.storage_path).await?;
        Ok(answer)
    }
}

#[async_trait]
impl AnswerService for AnswerServiceImpl {
    async fn submit_answer(&self, user_id: &str, course_id: &str, exam_id: &str, file: Upload) -> RehlaResult<()> {
        debug!("Submitting answer: {}/{}/{}", user_id, course_id, exam_id);
        let content_type = file.check(ANSWER_TYPES)?;
        let exam = self.exam(course_id, exam_id).await?;

        let path = Answer::storage_path_for(course_id, exam_id, user_id);
        self.storage.upload(&path, file.bytes, content_type).await?;

        let answer = Answer {
            id: exam_id.to_string(),
            course_id: course_id.to_string(),
            exam_title: exam.title,
            storage_path: path.clone(),
            grade: 0,
            out_of: 0,
            notes: String::new(),
            corrected: false,
            date_of_submission: Utc::now(),
            url: String::new(),
        };
        if let Err(e) = self.answer_repository.save(user_id, &answer).await {
            if let Err(delete_err) = self.storage.delete(&path).await {
                warn!("Failed to remove orphaned answer {}: {}", path, delete_err);
            }
            return Err(e);
        }

        info!("Answer submitted: {}/{}/{}", user_id, course_id, exam_id);
        Ok(())
    }

    async fn list_answers(&self, user_id: &str, course_id: &str) -> RehlaResult<Vec<Answer>> {
        self.answer_repository.find_all(user_id, course_id).await
    }

    async fn get_answer(&self, user_id: &str, course_id: &str, exam_id: &str) -> RehlaResult<Answer> {
        self.find(user_id, course_id, exam_id).await
    }

    async fn answers_for_exam(&self, course_id: &str, exam_id: &str) -> RehlaResult<ExamAnswers> {
        debug!("Listing answers to {}/{}", course_id, exam_id);
        let (corrected, uncorrected): (Vec<_>, Vec<_>) = self
            .answer_repository
            .find_by_exam(course_id, exam_id)
            .await?
            .into_iter()
            .map(|(user, answer)| SubmittedAnswer {
                user_name: user.full_name(),
                user_id: user.id,
                answer,
            })
            .partition(|submitted| submitted.answer.corrected);
        Ok(ExamAnswers { corrected, uncorrected })
    }

    async fn get_submission(&self, course_id: &str, exam_id: &str, user_id: &str) -> RehlaResult<SubmittedAnswer> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| RehlaError::not_found("User", user_id))?;
        let answer = self.find(user_id, course_id, exam_id).await?;
        Ok(SubmittedAnswer {
            user_name: user.full_name(),
            user_id: user.id,
            answer,
        })
    }

    async fn correct_answer(
        &self,
        course_id: &str,
        exam_id: &str,
        user_id: &str,
        correction: AnswerCorrection,
    ) -> RehlaResult<()> {
        if correction.out_of <= 0 || correction.grade < 0 || correction.grade > correction.out_of {
            return Err(RehlaError::validation("grade must be between 0 and out_of"));
        }
        if self
            .answer_repository
            .find(user_id, course_id, exam_id)
            .await?
            .is_none()
        {
            return Err(RehlaError::not_found("Answer", exam_id));
        }

        let updates: FieldUpdates = correction.into();
        self.answer_repository
            .update(user_id, course_id, exam_id, &updates)
            .await?;
        info!("Answer corrected: {}/{}/{}", user_id, course_id, exam_id);
        Ok(())
    }
}

impl std::fmt::Debug for AnswerServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerServiceImpl").finish_non_exhaustive()
    }
}
