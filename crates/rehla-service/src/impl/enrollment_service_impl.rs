//! Enrollment service implementation.

use crate::cache::{CacheAside, CacheInterface, CacheKey};
use crate::enrollment_service::EnrollmentService;
use async_trait::async_trait;
use rehla_core::{Course, FieldUpdates, Payment, RehlaError, RehlaResult, Subscription, SubscriptionPatch};
use rehla_repository::{CourseRepository, PaymentRepository, SubscriptionRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Enrollment service backed by the subscription and payment repositories.
#[derive(Component)]
#[shaku(interface = EnrollmentService)]
pub struct EnrollmentServiceImpl {
    #[shaku(inject)]
    course_repository: Arc<dyn CourseRepository>,
    #[shaku(inject)]
    subscription_repository: Arc<dyn SubscriptionRepository>,
    #[shaku(inject)]
    payment_repository: Arc<dyn PaymentRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl EnrollmentServiceImpl {
    /// Creates a new enrollment service.
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        subscription_repository: Arc<dyn SubscriptionRepository>,
        payment_repository: Arc<dyn PaymentRepository>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            course_repository,
            subscription_repository,
            payment_repository,
            cache,
        }
    }

    async fn course(&self, course_id: &str) -> RehlaResult<Course> {
        let repository = &self.course_repository;
        CacheAside::new(self.cache.as_ref())
            .read_through(&CacheKey::course(course_id), || async move {
                repository
                    .find_by_id(course_id)
                    .await?
                    .ok_or_else(|| RehlaError::not_found("Course", course_id))
            })
            .await
    }

    async fn ensure_subscription(&self, user_id: &str, course_id: &str) -> RehlaResult<Subscription> {
        self.subscription_repository
            .find(user_id, course_id)
            .await?
            .ok_or_else(|| RehlaError::not_found("Subscription", course_id))
    }
}

#[async_trait]
impl EnrollmentService for EnrollmentServiceImpl {
    async fn is_active(&self, user_id: &str, course_id: &str) -> RehlaResult<bool> {
        Ok(self
            .subscription_repository
            .find(user_id, course_id)
            .await?
            .is_some_and(|s| s.active))
    }

    async fn list_subscriptions(&self, user_id: &str) -> RehlaResult<Vec<Subscription>> {
        debug!("Listing subscriptions of {}", user_id);
        self.subscription_repository.find_all(user_id).await
    }

    async fn get_subscription(&self, user_id: &str, course_id: &str) -> RehlaResult<Subscription> {
        self.ensure_subscription(user_id, course_id).await
    }

    async fn subscribed_courses(&self, user_id: &str) -> RehlaResult<Vec<Course>> {
        let mut courses = Vec::new();
        for subscription in self.subscription_repository.find_all(user_id).await? {
            if subscription.active {
                courses.push(self.course(&subscription.id).await?);
            }
        }
        Ok(courses)
    }

    async fn subscribe(&self, user_id: &str, course_id: &str, active: bool) -> RehlaResult<()> {
        debug!("Subscribing {} to {}", user_id, course_id);
        let course = self.course(course_id).await?;
        let subscription = Subscription {
            id: course_id.to_string(),
            course_title: course.title,
            active,
        };
        self.subscription_repository.save(user_id, &subscription).await?;
        info!("Subscription saved: {}/{} active={}", user_id, course_id, active);
        Ok(())
    }

    async fn update_subscription(&self, user_id: &str, course_id: &str, patch: SubscriptionPatch) -> RehlaResult<()> {
        self.ensure_subscription(user_id, course_id).await?;
        let updates: FieldUpdates = patch.into();
        if updates.is_empty() {
            return Ok(());
        }
        self.subscription_repository
            .update(user_id, course_id, &updates)
            .await?;
        info!("Subscription updated: {}/{}", user_id, course_id);
        Ok(())
    }

    async fn unsubscribe(&self, user_id: &str, course_id: &str) -> RehlaResult<()> {
        if !self.subscription_repository.delete(user_id, course_id).await? {
            return Err(RehlaError::not_found("Subscription", course_id));
        }
        info!("Subscription deleted: {}/{}", user_id, course_id);
        Ok(())
    }

    async fn list_payments(&self, user_id: &str, course_id: &str) -> RehlaResult<Vec<Payment>> {
        self.payment_repository.find_all(user_id, course_id).await
    }

    async fn record_payment(&self, user_id: &str, course_id: &str, payment: Payment) -> RehlaResult<String> {
        if payment.amount_paid < 0 {
            return Err(RehlaError::validation("amount can't be negative"));
        }
        self.ensure_subscription(user_id, course_id).await?;
        let payment_id = self.payment_repository.create(user_id, course_id, &payment).await?;
        info!("Payment recorded: {}/{}/{}", user_id, course_id, payment_id);
        Ok(payment_id)
    }

    async fn delete_payment(&self, user_id: &str, course_id: &str, payment_id: &str) -> RehlaResult<()> {
        if !self
            .payment_repository
            .delete(user_id, course_id, payment_id)
            .await?
        {
            return Err(RehlaError::not_found("Payment", payment_id));
        }
        info!("Payment deleted: {}/{}/{}", user_id, course_id, payment_id);
        Ok(())
    }
}

impl std::fmt::Debug for EnrollmentServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentServiceImpl").finish_non_exhaustive()
    }
}
