//! Exams, answers, materials, grades and payments of a subscriber.

use crate::extractors::{Auth, MultipartForm};
use crate::responses::{page, AppError, AppResult};
use crate::state::WebState;
use crate::views;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use rehla_core::RehlaError;

pub(super) async fn exam(
    State(state): State<WebState>,
    auth: Auth,
    Path((course_id, exam_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let user = auth.subscriber(&course_id)?;
    let exam = state.exam_service.get_exam(&course_id, &exam_id).await?;
    let answer = match state
        .answer_service
        .get_answer(&user.user_id, &course_id, &exam_id)
        .await
    {
        Ok(answer) => Some(answer),
        Err(RehlaError::NotFound { .. }) => None,
        Err(e) => return Err(e.into()),
    };
    Ok(page(views::web::exam(Some(user), &course_id, &exam, answer.as_ref())))
}

pub(super) async fn submit_answer(
    State(state): State<WebState>,
    auth: Auth,
    Path((course_id, exam_id)): Path<(String, String)>,
    mut form: MultipartForm,
) -> AppResult<StatusCode> {
    let user = auth.subscriber(&course_id)?;
    let file = form.require_file("answer")?;
    state
        .answer_service
        .submit_answer(&user.user_id, &course_id, &exam_id, file)
        .await?;
    Ok(StatusCode::OK)
}

pub(super) async fn materials(State(state): State<WebState>, auth: Auth) -> AppResult<Html<String>> {
    let courses = match auth.principal() {
        Some(user) => state.enrollment_service.subscribed_courses(&user.user_id).await?,
        None => Vec::new(),
    };
    Ok(page(views::web::materials(auth.principal(), &courses)))
}

pub(super) async fn free_materials(State(state): State<WebState>, auth: Auth) -> AppResult<Html<String>> {
    let materials = state.material_service.list_free_materials().await?;
    Ok(page(views::web::material_list(auth.principal(), "الملازم المجانية", &materials)))
}

/// Materials of free courses are open to any logged-in user.
pub(super) async fn course_materials(
    State(state): State<WebState>,
    auth: Auth,
    Path(course_id): Path<String>,
) -> AppResult<Html<String>> {
    let user = auth.user()?;
    let course = state.course_service.get_course(&course_id).await?;
    if !course.free && !auth.is_subscribed_to(&course_id) {
        return Err(AppError(RehlaError::subscription_required()));
    }
    let materials = state.material_service.list_materials(&course_id).await?;
    Ok(page(views::web::material_list(Some(user), &course.title, &materials)))
}

pub(super) async fn progress(State(state): State<WebState>, auth: Auth) -> AppResult<Html<String>> {
    let courses = match auth.principal() {
        Some(user) => state.enrollment_service.subscribed_courses(&user.user_id).await?,
        None => Vec::new(),
    };
    Ok(page(views::web::progress(auth.principal(), &courses)))
}

pub(super) async fn grades(
    State(state): State<WebState>,
    auth: Auth,
    Path(course_id): Path<String>,
) -> AppResult<Html<String>> {
    let user = auth.subscriber(&course_id)?;
    let course = state.course_service.get_course(&course_id).await?;
    let answers = state.answer_service.list_answers(&user.user_id, &course_id).await?;
    Ok(page(views::web::grades(Some(user), &course, &answers)))
}

pub(super) async fn answer(
    State(state): State<WebState>,
    auth: Auth,
    Path((course_id, exam_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let user = auth.subscriber(&course_id)?;
    let answer = state
        .answer_service
        .get_answer(&user.user_id, &course_id, &exam_id)
        .await?;
    Ok(page(views::web::answer(Some(user), &answer)))
}

pub(super) async fn payments(State(state): State<WebState>, auth: Auth) -> AppResult<Html<String>> {
    let user = auth.user()?;
    let subscriptions = state.enrollment_service.list_subscriptions(&user.user_id).await?;
    Ok(page(views::web::payments(Some(user), &subscriptions)))
}

pub(super) async fn payment_history(
    State(state): State<WebState>,
    auth: Auth,
    Path(course_id): Path<String>,
) -> AppResult<Html<String>> {
    let user = auth.user()?;
    let course = state.course_service.get_course(&course_id).await?;
    let payments = state
        .enrollment_service
        .list_payments(&user.user_id, &course_id)
        .await?;
    Ok(page(views::web::payment_history(Some(user), &course, &payments)))
}
