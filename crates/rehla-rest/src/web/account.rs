//! Signup, login and the subscriber's own account.

use crate::extractors::{Auth, MultipartForm, ValidatedJson};
use crate::responses::{hx_redirect, page, AppError, AppResult};
use crate::state::WebState;
use crate::views;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use rehla_core::{RehlaError, SessionToken};
use rehla_service::{ContactRequest, LoginRequest, ResetPasswordRequest, SignupRequest};
use tracing::info;

fn signed_in() -> Response {
    (StatusCode::CONFLICT, "user is signed in").into_response()
}

pub(super) async fn profile(State(state): State<WebState>, auth: Auth) -> AppResult<Html<String>> {
    let principal = auth.user()?;
    let user = state.account_service.get_user(&principal.user_id).await?;
    Ok(page(views::web::profile(principal, &user)))
}

pub(super) async fn change_profile_image(
    State(state): State<WebState>,
    auth: Auth,
    mut form: MultipartForm,
) -> AppResult<Response> {
    let user = auth.user()?;
    let image = form.require_file("img")?;
    state
        .account_service
        .change_profile_image(&user.user_id, image)
        .await?;
    Ok(hx_redirect("/myprofile"))
}

pub(super) async fn contact_page(auth: Auth) -> Html<String> {
    page(views::web::contact(auth.principal()))
}

pub(super) async fn contact(
    State(state): State<WebState>,
    Form(request): Form<ContactRequest>,
) -> AppResult<StatusCode> {
    state.account_service.send_contact_message(request).await?;
    Ok(StatusCode::OK)
}

pub(super) async fn reset_page(auth: Auth) -> AppResult<Html<String>> {
    let user = auth.user()?;
    Ok(page(views::web::reset(user)))
}

pub(super) async fn reset_password(
    State(state): State<WebState>,
    auth: Auth,
    Form(request): Form<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    let user = auth.user()?;
    state
        .account_service
        .reset_password(&user.user_id, request)
        .await?;
    Ok(StatusCode::OK)
}

pub(super) async fn signup_page(auth: Auth) -> Response {
    if auth.is_authenticated() {
        return signed_in();
    }
    page(views::web::signup()).into_response()
}

/// Creates the account and logs it in. Field errors come back as a
/// `400` JSON object keyed by field name.
pub(super) async fn signup(
    State(state): State<WebState>,
    auth: Auth,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> AppResult<Response> {
    if auth.is_authenticated() {
        return Ok(signed_in());
    }
    let credentials = LoginRequest {
        phone_number: request.phone_number.clone(),
        password: request.password.clone(),
    };
    let user_id = state.account_service.signup(request).await?;
    let outcome = state.account_service.login(credentials).await?;
    info!("Subscriber {} signed up", user_id);

    let jar = jar.add(state.cookie.session_cookie(&outcome.session_token));
    Ok((StatusCode::CREATED, jar, user_id).into_response())
}

pub(super) async fn login_page(auth: Auth) -> Response {
    if auth.is_authenticated() {
        return signed_in();
    }
    page(views::web::login()).into_response()
}

pub(super) async fn login(
    State(state): State<WebState>,
    auth: Auth,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> AppResult<Response> {
    if auth.is_authenticated() {
        return Ok(signed_in());
    }
    let outcome = state.account_service.login(request).await?;
    let jar = jar.add(state.cookie.session_cookie(&outcome.session_token));
    Ok((jar, hx_redirect("/")).into_response())
}

pub(super) async fn logout(State(state): State<WebState>, auth: Auth, jar: CookieJar) -> AppResult<Response> {
    let user = auth.user()?;
    let token = jar
        .get(&state.cookie.name)
        .and_then(|cookie| SessionToken::parse(cookie.value()))
        .ok_or_else(|| AppError(RehlaError::login_required()))?;
    state.account_service.logout(&user.user_id, &token).await?;

    let jar = jar.remove(state.cookie.removal_cookie());
    Ok((jar, hx_redirect("/")).into_response())
}
