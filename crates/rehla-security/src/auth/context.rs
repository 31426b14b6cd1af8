//! Per-request authorization state.

use super::principal::Principal;
use super::requirement::{Grant, Requirement, SubscriptionLookup};
use rehla_core::{RehlaError, RehlaResult};
use tracing::debug;

/// Authorization state of a single request.
///
/// Built by the session middleware and advanced by route guards. Handlers
/// receive it explicitly; nothing about the caller lives in ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthContext {
    /// No session, or a session token nobody owns.
    #[default]
    Anonymous,
    /// A session token resolved to a principal.
    Authenticated(Principal),
    /// A route requirement was met.
    Authorized { principal: Principal, grant: Grant },
}

impl AuthContext {
    /// Returns the principal, if any.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(principal) | Self::Authorized { principal, .. } => Some(principal),
        }
    }

    /// Returns true unless anonymous.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }

    /// Returns true for admin principals.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.principal().is_some_and(Principal::is_admin)
    }

    /// Returns the grant of an authorized request.
    #[must_use]
    pub fn grant(&self) -> Option<&Grant> {
        match self {
            Self::Authorized { grant, .. } => Some(grant),
            _ => None,
        }
    }

    /// Returns true when the request was authorized by a subscription to `course_id`.
    #[must_use]
    pub fn is_subscribed_to(&self, course_id: &str) -> bool {
        matches!(self.grant(), Some(Grant::Subscriber { course_id: c }) if c == course_id)
    }

    /// Evaluates `any_of` as an ordered OR and advances to `Authorized` with
    /// the first requirement met.
    ///
    /// Anonymous requests fail with `loginRequired`. An unmet subscription
    /// fails with `subRequired`; an unmet role fails with a plain 401.
    pub async fn authorize(
        self,
        any_of: &[Requirement],
        subscriptions: &dyn SubscriptionLookup,
    ) -> RehlaResult<Self> {
        let principal = match self {
            Self::Anonymous => return Err(RehlaError::login_required()),
            Self::Authenticated(principal) | Self::Authorized { principal, .. } => principal,
        };

        let mut wanted_subscription = false;
        for requirement in any_of {
            let grant = match requirement {
                Requirement::Authenticated => Some(Grant::Authenticated),
                Requirement::Role(role) => principal
                    .role
                    .satisfies(*role)
                    .then_some(Grant::Role(principal.role)),
                Requirement::ActiveSubscription { course_id } => {
                    wanted_subscription = true;
                    subscriptions
                        .is_active(&principal.user_id, course_id)
                        .await?
                        .then(|| Grant::Subscriber {
                            course_id: course_id.clone(),
                        })
                }
            };
            if let Some(grant) = grant {
                debug!("Authorized {} via {}", principal.user_id, requirement);
                return Ok(Self::Authorized { principal, grant });
            }
        }

        debug!("Denied {} for {:?}", principal.user_id, any_of);
        if wanted_subscription {
            Err(RehlaError::subscription_required())
        } else {
            Err(RehlaError::unauthorized("unauthorized"))
        }
    }
}
