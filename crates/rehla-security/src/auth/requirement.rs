//! Route requirements.

use async_trait::async_trait;
use rehla_core::{RehlaResult, Role};
use std::fmt;

/// Answers whether a subscriber holds an active subscription.
#[async_trait]
pub trait SubscriptionLookup: Send + Sync {
    /// Returns true when `user_id` is actively subscribed to `course_id`.
    async fn is_active(&self, user_id: &str, course_id: &str) -> RehlaResult<bool>;
}

/// One way a request may satisfy a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any authenticated principal.
    Authenticated,
    /// A principal whose role satisfies this role.
    Role(Role),
    /// An authenticated principal with an active subscription to the course.
    ActiveSubscription { course_id: String },
}

impl Requirement {
    /// Admin-only.
    #[must_use]
    pub const fn admin() -> Self {
        Self::Role(Role::Admin)
    }

    /// Corrector, which admins satisfy as well.
    #[must_use]
    pub const fn corrector() -> Self {
        Self::Role(Role::Corrector)
    }

    /// Active subscription to `course_id`.
    #[must_use]
    pub fn subscription(course_id: impl Into<String>) -> Self {
        Self::ActiveSubscription {
            course_id: course_id.into(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated => f.write_str("authenticated"),
            Self::Role(role) => write!(f, "role {}", role),
            Self::ActiveSubscription { course_id } => write!(f, "subscription to {}", course_id),
        }
    }
}

/// What an authorized request was granted by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    Authenticated,
    Role(Role),
    Subscriber { course_id: String },
}

/// A subscription lookup for routes that never check subscriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSubscriptions;

#[async_trait]
impl SubscriptionLookup for NoSubscriptions {
    async fn is_active(&self, _user_id: &str, _course_id: &str) -> RehlaResult<bool> {
        Ok(false)
    }
}
