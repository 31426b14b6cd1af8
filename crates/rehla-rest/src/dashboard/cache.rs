//! Manual cache refreshes.

use crate::extractors::Auth;
use crate::responses::{page, see_other, AppResult};
use crate::state::DashboardState;
use crate::views;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(super) struct RefreshStatus {
    refreshed: Option<String>,
    count: Option<usize>,
}

impl RefreshStatus {
    fn message(&self) -> Option<String> {
        let refreshed = self.refreshed.as_deref()?;
        Some(match self.count {
            Some(count) => format!("Refreshed {} {}", count, refreshed),
            None => format!("Refreshed {}", refreshed),
        })
    }
}

fn back_to_status(refreshed: &str, count: Option<usize>) -> Response {
    let location = match count {
        Some(count) => format!("/cache?refreshed={}&count={}", refreshed, count),
        None => format!("/cache?refreshed={}", refreshed),
    };
    see_other(&location).into_response()
}

pub(super) async fn status(
    State(state): State<DashboardState>,
    auth: Auth,
    Query(status): Query<RefreshStatus>,
) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let courses = state.course_service.list_courses().await?;
    let message = status.message();
    Ok(page(views::dashboard::cache(
        staff,
        state.cache_admin_service.is_enabled(),
        &courses,
        message.as_deref(),
    )))
}

pub(super) async fn refresh_course(
    State(state): State<DashboardState>,
    Path(course_id): Path<String>,
) -> AppResult<Response> {
    state.cache_admin_service.refresh_course(&course_id).await?;
    Ok(back_to_status("course", None))
}

pub(super) async fn refresh_lectures(
    State(state): State<DashboardState>,
    Path(course_id): Path<String>,
) -> AppResult<Response> {
    let count = state.cache_admin_service.refresh_lectures(&course_id).await?;
    Ok(back_to_status("lectures", Some(count)))
}

pub(super) async fn refresh_exams(
    State(state): State<DashboardState>,
    Path(course_id): Path<String>,
) -> AppResult<Response> {
    let count = state.cache_admin_service.refresh_exams(&course_id).await?;
    Ok(back_to_status("exams", Some(count)))
}

pub(super) async fn refresh_materials(
    State(state): State<DashboardState>,
    Path(course_id): Path<String>,
) -> AppResult<Response> {
    let count = state.cache_admin_service.refresh_materials(&course_id).await?;
    Ok(back_to_status("materials", Some(count)))
}
