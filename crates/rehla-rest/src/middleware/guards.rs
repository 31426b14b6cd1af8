//! Role and subscription guards.
//!
//! Guards run after [`session_middleware`](super::session_middleware) and
//! upgrade the request's context from `Authenticated` to `Authorized`.

use crate::responses::{see_other, AppError};
use crate::state::WebState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use rehla_core::RehlaError;
use rehla_security::{AuthContext, NoSubscriptions, Requirement, SubscriptionLookup};
use rehla_service::EnrollmentLookup;
use std::collections::HashMap;

fn context_of(request: &Request<Body>) -> AuthContext {
    request.extensions().get::<AuthContext>().cloned().unwrap_or_default()
}

async fn authorize(
    request: &mut Request<Body>,
    any_of: &[Requirement],
    subscriptions: &dyn SubscriptionLookup,
) -> Result<(), RehlaError> {
    let context = context_of(request).authorize(any_of, subscriptions).await?;
    request.extensions_mut().insert(context);
    Ok(())
}

/// Marks the request as subscribed when the logged-in user has an active
/// subscription to the `courseId` in the path. Never rejects; handlers
/// decide what an unsubscribed user may see.
pub async fn mark_subscription(
    State(state): State<WebState>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authenticated = context_of(&request).is_authenticated();
    if let (true, Some(course_id)) = (authenticated, params.get("courseId")) {
        let lookup = EnrollmentLookup(state.enrollment_service.as_ref());
        match authorize(&mut request, &[Requirement::subscription(course_id.as_str())], &lookup).await {
            Ok(()) | Err(RehlaError::Unauthorized(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(next.run(request).await)
}

/// Admits only users with an active subscription to the `courseId` in the
/// path. Runs before the handler's extractors, so rejected requests never
/// have their body read.
pub async fn require_subscription(
    State(state): State<WebState>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let course_id = params.get("courseId").map(String::as_str).unwrap_or_default();
    let lookup = EnrollmentLookup(state.enrollment_service.as_ref());
    authorize(&mut request, &[Requirement::subscription(course_id)], &lookup).await?;
    Ok(next.run(request).await)
}

/// Redirects anonymous staff to the login page.
pub async fn require_login(request: Request<Body>, next: Next) -> Response {
    if context_of(&request).is_authenticated() {
        next.run(request).await
    } else {
        see_other("/login").into_response()
    }
}

/// Admits admins only.
pub async fn require_admin(mut request: Request<Body>, next: Next) -> Result<Response, AppError> {
    authorize(&mut request, &[Requirement::admin()], &NoSubscriptions).await?;
    Ok(next.run(request).await)
}

/// Admits correctors and admins.
pub async fn require_corrector(mut request: Request<Body>, next: Next) -> Result<Response, AppError> {
    authorize(&mut request, &[Requirement::corrector()], &NoSubscriptions).await?;
    Ok(next.run(request).await)
}
