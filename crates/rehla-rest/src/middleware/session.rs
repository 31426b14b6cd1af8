//! Session resolution.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use rehla_core::SessionToken;
use rehla_security::AuthContext;
use rehla_service::SessionResolver;
use std::sync::Arc;
use tracing::debug;

/// State of the session middleware.
#[derive(Clone)]
pub struct SessionState {
    pub resolver: Arc<dyn SessionResolver>,
    pub cookie_name: String,
}

impl SessionState {
    pub fn new(resolver: Arc<dyn SessionResolver>, cookie_name: impl Into<String>) -> Self {
        Self {
            resolver,
            cookie_name: cookie_name.into(),
        }
    }
}

/// Resolves the session cookie and stores the request's [`AuthContext`]
/// in the extensions. A missing or unknown token leaves it anonymous.
pub async fn session_middleware(
    State(state): State<SessionState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(&state.cookie_name)
        .and_then(|cookie| SessionToken::parse(cookie.value()));

    let context = match token {
        Some(token) => state.resolver.resolve(&token).await?,
        None => AuthContext::Anonymous,
    };
    if let Some(principal) = context.principal() {
        debug!("Request authenticated as {}", principal.user_id);
    }

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
