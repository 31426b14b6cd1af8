//! Response types shared by both backends.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use rehla_core::{FieldError, RehlaError};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub RehlaError);

impl From<RehlaError> for AppError {
    fn from(err: RehlaError) -> Self {
        Self(err)
    }
}

impl AppError {
    /// Text sent to the client. Server errors never leak their cause.
    #[must_use]
    pub fn client_message(&self) -> String {
        match &self.0 {
            RehlaError::Unauthorized(reason) => reason.clone(),
            RehlaError::Validation(message)
            | RehlaError::Conflict(message)
            | RehlaError::Forbidden(message) => message.clone(),
            RehlaError::NotFound { .. } => "Not Found".to_string(),
            RehlaError::InvalidCredentials => "invalid credentials".to_string(),
            RehlaError::Timeout(_) => "Service Unavailable".to_string(),
            _ => "Internal Server Error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.0.error_code(), "Request failed: {}", self.0);
        } else {
            debug!(code = self.0.error_code(), "Request rejected: {}", self.0);
        }

        (status, self.client_message()).into_response()
    }
}

/// Result type for Axum handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Field errors as the flat `{field: message}` object forms expect.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl From<Vec<FieldError>> for FieldErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        let mut map = BTreeMap::new();
        for error in errors {
            map.entry(error.field).or_insert(error.message);
        }
        Self(map)
    }
}

impl IntoResponse for FieldErrors {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self.0)).into_response()
    }
}

/// A 303 redirect, used after dashboard form posts.
pub fn see_other(location: &str) -> Redirect {
    Redirect::to(location)
}

/// An empty 200 that tells htmx to navigate to `location`.
pub fn hx_redirect(location: &str) -> Response {
    let mut response = StatusCode::OK.into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert("HX-Redirect", value);
    }
    response
}

/// A rendered page.
pub fn page(body: String) -> Html<String> {
    Html(body)
}

/// Plain-text Prometheus exposition.
pub fn metrics_text(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_show_their_message() {
        assert_eq!(AppError(RehlaError::login_required()).client_message(), "loginRequired");
        assert_eq!(
            AppError(RehlaError::validation("file type is not allowed")).client_message(),
            "file type is not allowed"
        );
    }

    #[test]
    fn test_server_errors_are_generic() {
        let response = AppError(RehlaError::store("connection reset by peer")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError(RehlaError::store("connection reset by peer")).client_message(),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let errors: FieldErrors = vec![
            FieldError {
                field: "phone_number".to_string(),
                message: "bad".to_string(),
                code: "phone_number".to_string(),
            },
            FieldError {
                field: "phone_number".to_string(),
                message: "ignored".to_string(),
                code: "other".to_string(),
            },
        ]
        .into();
        assert_eq!(errors.0.get("phone_number").map(String::as_str), Some("bad"));
    }
}
