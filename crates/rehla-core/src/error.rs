//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Rehla.
///
/// Client-side variants map to 4xx responses and carry a message that is
/// safe to show to the user. Infrastructure variants map to 5xx responses
/// and are only ever logged.
#[derive(Error, Debug)]
pub enum RehlaError {
    // ============ Client Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate phone number)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Authentication/Authorization Errors ============
    /// Unauthorized access. The payload is the bare reason sent to the client
    /// (`loginRequired`, `subRequired`, ...).
    #[error("{0}")]
    Unauthorized(String),

    /// Forbidden access
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ============ Infrastructure Errors ============
    /// Authoritative document store error
    #[error("Document store error: {0}")]
    Store(String),

    /// Object storage error
    #[error("Object storage error: {0}")]
    Storage(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// External service error
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RehlaError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_) | Self::InvalidCredentials => 401,
            Self::Forbidden(_) => 403,
            Self::Timeout(_) => 503,
            Self::ExternalService { .. } => 502,
            Self::Store(_)
            | Self::Storage(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Store(_) => "STORE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true when the error belongs to the client (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(reason: T) -> Self {
        Self::Unauthorized(reason.into())
    }

    /// The request needs a logged in user.
    #[must_use]
    pub fn login_required() -> Self {
        Self::Unauthorized("loginRequired".to_string())
    }

    /// The request needs an active subscription to the course in the path.
    #[must_use]
    pub fn subscription_required() -> Self {
        Self::Unauthorized("subRequired".to_string())
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates a store error.
    #[must_use]
    pub fn store<T: Into<String>>(message: T) -> Self {
        Self::Store(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for RehlaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error body for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `RehlaError`.
    #[must_use]
    pub fn from_error(error: &RehlaError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&RehlaError> for ErrorResponse {
    fn from(error: &RehlaError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(RehlaError::not_found("Course", "c1").status_code(), 404);
        assert_eq!(RehlaError::validation("title is blank").status_code(), 400);
        assert_eq!(RehlaError::login_required().status_code(), 401);
        assert_eq!(RehlaError::subscription_required().status_code(), 401);
        assert_eq!(RehlaError::InvalidCredentials.status_code(), 401);
        assert_eq!(RehlaError::forbidden("corrector").status_code(), 403);
        assert_eq!(RehlaError::conflict("phone taken").status_code(), 409);
        assert_eq!(RehlaError::store("unavailable").status_code(), 500);
        assert_eq!(RehlaError::Cache("down".to_string()).status_code(), 500);
        assert_eq!(RehlaError::Timeout("store".to_string()).status_code(), 503);
    }

    #[test]
    fn test_unauthorized_displays_bare_reason() {
        assert_eq!(RehlaError::login_required().to_string(), "loginRequired");
        assert_eq!(RehlaError::subscription_required().to_string(), "subRequired");
    }

    #[test]
    fn test_client_error_split() {
        assert!(RehlaError::validation("x").is_client_error());
        assert!(RehlaError::login_required().is_client_error());
        assert!(!RehlaError::store("x").is_client_error());
        assert!(!RehlaError::internal("x").is_client_error());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(RehlaError::not_found("Exam", 1).error_code(), "NOT_FOUND");
        assert_eq!(RehlaError::store("db").error_code(), "STORE_ERROR");
        assert_eq!(RehlaError::Storage("bucket".to_string()).error_code(), "STORAGE_ERROR");
        assert_eq!(RehlaError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_response_from_error() {
        let err = RehlaError::not_found("Lecture", "l1");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(response.message.contains("Lecture"));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = RehlaError::validation("bad input");
        let details = vec![FieldError {
            field: "phone_number".to_string(),
            message: "invalid".to_string(),
            code: "phone".to_string(),
        }];
        let response = ErrorResponse::from_error(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
