//! Subscription and payment service trait.

use async_trait::async_trait;
use rehla_core::{Course, Interface, Payment, RehlaResult, Subscription, SubscriptionPatch};
use rehla_security::SubscriptionLookup;

/// Enrollment service trait.
#[async_trait]
pub trait EnrollmentService: Interface + Send + Sync {
    /// Returns true when the user holds an active subscription to the course.
    ///
    /// Always asks the store; subscription state is never cached.
    async fn is_active(&self, user_id: &str, course_id: &str) -> RehlaResult<bool>;

    /// Lists a user's subscriptions, active or not.
    async fn list_subscriptions(&self, user_id: &str) -> RehlaResult<Vec<Subscription>>;

    /// Gets a user's subscription to a course.
    async fn get_subscription(&self, user_id: &str, course_id: &str) -> RehlaResult<Subscription>;

    /// Lists the courses a user is actively subscribed to.
    async fn subscribed_courses(&self, user_id: &str) -> RehlaResult<Vec<Course>>;

    /// Subscribes a user to a course.
    async fn subscribe(&self, user_id: &str, course_id: &str, active: bool) -> RehlaResult<()>;

    /// Updates a subscription.
    async fn update_subscription(&self, user_id: &str, course_id: &str, patch: SubscriptionPatch) -> RehlaResult<()>;

    /// Removes a subscription.
    async fn unsubscribe(&self, user_id: &str, course_id: &str) -> RehlaResult<()>;

    /// Lists the payments of a subscription, newest first.
    async fn list_payments(&self, user_id: &str, course_id: &str) -> RehlaResult<Vec<Payment>>;

    /// Records a payment and returns its id.
    async fn record_payment(&self, user_id: &str, course_id: &str, payment: Payment) -> RehlaResult<String>;

    /// Deletes a payment.
    async fn delete_payment(&self, user_id: &str, course_id: &str, payment_id: &str) -> RehlaResult<()>;
}

/// Lets authorization checks ask an enrollment service about subscriptions.
#[derive(Clone, Copy)]
pub struct EnrollmentLookup<'a>(pub &'a dyn EnrollmentService);

#[async_trait]
impl SubscriptionLookup for EnrollmentLookup<'_> {
    async fn is_active(&self, user_id: &str, course_id: &str) -> RehlaResult<bool> {
        self.0.is_active(user_id, course_id).await
    }
}
