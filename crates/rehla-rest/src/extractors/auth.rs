//! Auth context extractor.

use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use rehla_core::RehlaError;
use rehla_security::{AuthContext, Principal};
use std::convert::Infallible;

/// The [`AuthContext`] the session middleware and guards attached to the
/// request. Anonymous when no middleware ran.
#[derive(Debug, Clone, Default)]
pub struct Auth(pub AuthContext);

impl std::ops::Deref for Auth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Auth {
    /// The logged-in principal, or `401 loginRequired`.
    pub fn user(&self) -> Result<&Principal, AppError> {
        self.0
            .principal()
            .ok_or_else(|| AppError(RehlaError::login_required()))
    }

    /// The logged-in principal subscribed to `course_id`, or `401
    /// loginRequired` / `401 subRequired`.
    pub fn subscriber(&self, course_id: &str) -> Result<&Principal, AppError> {
        let principal = self.user()?;
        if self.0.is_subscribed_to(course_id) {
            Ok(principal)
        } else {
            Err(AppError(RehlaError::subscription_required()))
        }
    }

    /// A staff member allowed to grade `course_id`.
    pub fn corrector_of(&self, course_id: &str) -> Result<&Principal, AppError> {
        let principal = self.user()?;
        if principal.can_correct(course_id) {
            Ok(principal)
        } else {
            Err(AppError(RehlaError::unauthorized("unauthorized")))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Auth(parts.extensions.get::<AuthContext>().cloned().unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehla_core::Role;
    use rehla_security::Grant;

    fn principal(role: Role, course_ids: &[&str]) -> Principal {
        Principal {
            user_id: "u1".to_string(),
            name: "Sara Hadi".to_string(),
            role,
            course_ids: course_ids.iter().map(ToString::to_string).collect(),
        }
    }

    fn reason(err: AppError) -> String {
        err.client_message()
    }

    #[test]
    fn test_anonymous_needs_login() {
        let auth = Auth::default();
        assert_eq!(reason(auth.user().unwrap_err()), "loginRequired");
        assert_eq!(reason(auth.subscriber("c1").unwrap_err()), "loginRequired");
    }

    #[test]
    fn test_subscriber_needs_grant_for_course() {
        let auth = Auth(AuthContext::Authorized {
            principal: principal(Role::Student, &[]),
            grant: Grant::Subscriber {
                course_id: "c1".to_string(),
            },
        });
        assert!(auth.subscriber("c1").is_ok());
        assert_eq!(reason(auth.subscriber("c2").unwrap_err()), "subRequired");
    }

    #[test]
    fn test_corrector_limited_to_courses() {
        let auth = Auth(AuthContext::Authenticated(principal(Role::Corrector, &["c1"])));
        assert!(auth.corrector_of("c1").is_ok());
        assert!(auth.corrector_of("c2").is_err());

        let admin = Auth(AuthContext::Authenticated(principal(Role::Admin, &[])));
        assert!(admin.corrector_of("c2").is_ok());
    }
}
