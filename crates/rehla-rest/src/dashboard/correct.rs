//! Grading of submitted answers.

use crate::extractors::Auth;
use crate::responses::{page, see_other, AppResult};
use crate::state::DashboardState;
use crate::views;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use rehla_core::{AnswerCorrection, RehlaError};

/// Admins grade every course; correctors only the ones assigned to them.
pub(super) async fn courses(State(state): State<DashboardState>, auth: Auth) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let courses = if staff.is_admin() {
        state.course_service.list_courses().await?
    } else {
        let mut courses = Vec::with_capacity(staff.course_ids.len());
        for course_id in &staff.course_ids {
            match state.course_service.get_course(course_id).await {
                Ok(course) => courses.push(course),
                Err(RehlaError::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        courses
    };
    Ok(page(views::dashboard::correct_courses(staff, &courses)))
}

pub(super) async fn exams(
    State(state): State<DashboardState>,
    auth: Auth,
    Path(course_id): Path<String>,
) -> AppResult<Html<String>> {
    let staff = auth.corrector_of(&course_id)?;
    let course = state.course_service.get_course(&course_id).await?;
    let exams = state.exam_service.list_exams(&course_id).await?;
    Ok(page(views::dashboard::correct_exams(staff, &course, &exams)))
}

pub(super) async fn answers(
    State(state): State<DashboardState>,
    auth: Auth,
    Path((course_id, exam_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let staff = auth.corrector_of(&course_id)?;
    let answers = state.answer_service.answers_for_exam(&course_id, &exam_id).await?;
    Ok(page(views::dashboard::correct_answers(staff, &course_id, &exam_id, &answers)))
}

pub(super) async fn answer(
    State(state): State<DashboardState>,
    auth: Auth,
    Path((course_id, exam_id, user_id)): Path<(String, String, String)>,
) -> AppResult<Html<String>> {
    let staff = auth.corrector_of(&course_id)?;
    let submitted = state
        .answer_service
        .get_submission(&course_id, &exam_id, &user_id)
        .await?;
    Ok(page(views::dashboard::correct_answer(staff, &course_id, &exam_id, &submitted)))
}

pub(super) async fn grade(
    State(state): State<DashboardState>,
    auth: Auth,
    Path((course_id, exam_id, user_id)): Path<(String, String, String)>,
    Form(correction): Form<AnswerCorrection>,
) -> AppResult<Response> {
    auth.corrector_of(&course_id)?;
    state
        .answer_service
        .correct_answer(&course_id, &exam_id, &user_id, correction)
        .await?;
    Ok(see_other(&format!("/correct/{}/{}", course_id, exam_id)).into_response())
}
