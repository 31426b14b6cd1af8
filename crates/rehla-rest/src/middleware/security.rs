//! Security headers and panic recovery.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Response, StatusCode},
};
use std::any::Any;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::error;

/// Headers set on every response.
pub const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("referrer-policy", "origin-when-cross-origin"),
    ("x-content-type-options", "nosniff"),
    ("x-xss-protection", "0"),
    ("x-frame-options", "deny"),
];

/// One overriding header layer per entry of [`SECURITY_HEADERS`].
#[must_use]
pub fn security_header_layers() -> Vec<SetResponseHeaderLayer<HeaderValue>> {
    SECURITY_HEADERS
        .iter()
        .map(|&(name, value)| {
            SetResponseHeaderLayer::overriding(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            )
        })
        .collect()
}

/// Turns a handler panic into a 500 that closes the connection.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Handler panicked");

    let mut response = Response::new(Body::from("Internal Server Error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_response_closes_connection() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONNECTION], "close");
    }

    #[test]
    fn test_header_names_are_valid() {
        assert_eq!(security_header_layers().len(), SECURITY_HEADERS.len());
    }
}
