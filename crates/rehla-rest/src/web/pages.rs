//! Course browsing.

use crate::extractors::Auth;
use crate::responses::{page, AppError, AppResult};
use crate::state::WebState;
use crate::views;
use axum::{
    extract::{Path, State},
    response::Html,
};
use rehla_core::RehlaError;
use tracing::debug;

pub(super) async fn home(State(state): State<WebState>, auth: Auth) -> AppResult<Html<String>> {
    let courses = state.course_service.list_active_courses().await?;
    Ok(page(views::web::home(auth.principal(), &courses)))
}

pub(super) async fn courses(State(state): State<WebState>, auth: Auth) -> AppResult<Html<String>> {
    let courses = state.course_service.list_active_courses().await?;
    Ok(page(views::web::courses(auth.principal(), &courses)))
}

pub(super) async fn course(
    State(state): State<WebState>,
    auth: Auth,
    Path(course_id): Path<String>,
) -> AppResult<Html<String>> {
    let overview = state.course_service.get_overview(&course_id).await?;
    let subscribed = auth.is_subscribed_to(&course_id);
    Ok(page(views::web::course(auth.principal(), &overview, subscribed)))
}

/// The first lectures of a course and free lectures are open to everyone.
pub(super) async fn lecture(
    State(state): State<WebState>,
    auth: Auth,
    Path((course_id, lecture_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let lecture = state.lecture_service.get_lecture(&course_id, &lecture_id).await?;
    if !lecture.is_preview() && !auth.is_subscribed_to(&course_id) {
        debug!("Lecture {}/{} needs a subscription", course_id, lecture_id);
        return Err(AppError(RehlaError::subscription_required()));
    }
    Ok(page(views::web::lecture(auth.principal(), &lecture)))
}

pub(super) async fn my_courses(State(state): State<WebState>, auth: Auth) -> AppResult<Html<String>> {
    let user = auth.user()?;
    let courses = state.enrollment_service.subscribed_courses(&user.user_id).await?;
    Ok(page(views::web::my_courses(Some(user), &courses)))
}
