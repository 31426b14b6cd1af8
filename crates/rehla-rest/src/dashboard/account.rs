//! Staff login and staff accounts.

use crate::extractors::Auth;
use crate::responses::{page, see_other, AppError, AppResult};
use crate::state::DashboardState;
use crate::views;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use rehla_core::{RehlaError, Role, SessionToken};
use rehla_service::{NewStaffRequest, StaffLoginRequest};
use serde::Deserialize;

pub(super) async fn home(auth: Auth) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    Ok(page(views::dashboard::home(staff)))
}

pub(super) async fn login_page(auth: Auth) -> Response {
    if auth.is_authenticated() {
        return see_other("/").into_response();
    }
    page(views::dashboard::login(None)).into_response()
}

/// Wrong credentials re-render the form with a 401.
pub(super) async fn login(
    State(state): State<DashboardState>,
    auth: Auth,
    jar: CookieJar,
    Form(request): Form<StaffLoginRequest>,
) -> AppResult<Response> {
    if auth.is_authenticated() {
        return Ok(see_other("/").into_response());
    }
    match state.account_service.login(request).await {
        Ok(outcome) => {
            let jar = jar.add(state.cookie.session_cookie(&outcome.session_token));
            Ok((jar, see_other("/")).into_response())
        }
        Err(RehlaError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            page(views::dashboard::login(Some("wrong username or password"))),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn logout(
    State(state): State<DashboardState>,
    auth: Auth,
    jar: CookieJar,
) -> AppResult<Response> {
    let staff = auth.user()?;
    if let Some(token) = jar
        .get(&state.cookie.name)
        .and_then(|cookie| SessionToken::parse(cookie.value()))
    {
        state.account_service.logout(&staff.user_id, &token).await?;
    }
    let jar = jar.remove(state.cookie.removal_cookie());
    Ok((jar, see_other("/login")).into_response())
}

pub(super) async fn staff(State(state): State<DashboardState>, auth: Auth) -> AppResult<Html<String>> {
    let current = auth.user()?;
    let staff = state.account_service.list_staff().await?;
    Ok(page(views::dashboard::staff(current, &staff)))
}

#[derive(Debug, Deserialize)]
pub(super) struct StaffForm {
    username: String,
    password: String,
    role: Role,
    #[serde(default)]
    course_ids: String,
}

impl From<StaffForm> for NewStaffRequest {
    fn from(form: StaffForm) -> Self {
        Self {
            username: form.username.trim().to_string(),
            password: form.password,
            role: form.role,
            course_ids: form
                .course_ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

pub(super) async fn create_staff(
    State(state): State<DashboardState>,
    Form(form): Form<StaffForm>,
) -> AppResult<Response> {
    state.account_service.create_staff(form.into()).await?;
    Ok(see_other("/staff").into_response())
}

pub(super) async fn delete_staff(
    State(state): State<DashboardState>,
    auth: Auth,
    Path(staff_id): Path<String>,
) -> AppResult<Response> {
    if auth.user()?.user_id == staff_id {
        return Err(AppError(RehlaError::validation("you can't delete your own account")));
    }
    state.account_service.delete_staff(&staff_id).await?;
    Ok(see_other("/staff").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_form_splits_course_ids() {
        let request: NewStaffRequest = StaffForm {
            username: " grader ".to_string(),
            password: "secret-pass".to_string(),
            role: Role::Corrector,
            course_ids: "c1, c2,,".to_string(),
        }
        .into();
        assert_eq!(request.username, "grader");
        assert_eq!(request.course_ids, vec!["c1".to_string(), "c2".to_string()]);
    }
}
