//! Subscriber repositories: users, their subscriptions, payments and answers.

use super::codec::{decode, decode_all, encode};
use crate::dao::{paths, DocumentStore};
use crate::traits::{AnswerRepository, PaymentRepository, SubscriptionRepository, UserRepository};
use async_trait::async_trait;
use rehla_core::{
    sort_newest_first, Answer, FieldUpdates, Payment, RehlaError, RehlaResult, Subscription, User,
};
use serde_json::Value;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, warn};

/// User repository backed by the document store.
#[derive(Component)]
#[shaku(interface = UserRepository)]
pub struct UserRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl UserRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn find_one_by(&self, field: &str, value: &str) -> RehlaResult<Option<User>> {
        let mut matches = self
            .store
            .find_by_field(&paths::users(), field, &Value::String(value.to_string()))
            .await?;
        if matches.len() > 1 {
            warn!("{} users share {} '{}'", matches.len(), field, value);
            return Err(RehlaError::internal(format!(
                "More than one user with the same {}",
                field
            )));
        }
        match matches.pop() {
            Some((id, document)) => Ok(Some(decode(&id, document)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_id(&self, user_id: &str) -> RehlaResult<Option<User>> {
        debug!("Repository: find user {}", user_id);
        match self.store.get(&paths::user(user_id)).await? {
            Some(document) => Ok(Some(decode(user_id, document)?)),
            None => Ok(None),
        }
    }

    async fn find_by_phone(&self, phone_number: &str) -> RehlaResult<Option<User>> {
        self.find_one_by("phone_number", phone_number).await
    }

    async fn find_by_session(&self, session_id: &str) -> RehlaResult<Option<User>> {
        if session_id.is_empty() {
            return Ok(None);
        }
        self.find_one_by("session_id", session_id).await
    }

    async fn find_all(&self) -> RehlaResult<Vec<User>> {
        decode_all(self.store.list(&paths::users()).await?)
    }

    async fn create(&self, user: &User) -> RehlaResult<String> {
        self.store.create(&paths::users(), encode(user)?).await
    }

    async fn update(&self, user_id: &str, updates: &FieldUpdates) -> RehlaResult<()> {
        self.store.update(&paths::user(user_id), updates).await
    }

    async fn delete(&self, user_id: &str) -> RehlaResult<bool> {
        self.store.delete(&paths::user(user_id)).await
    }
}

/// Subscription repository backed by the document store.
#[derive(Component)]
#[shaku(interface = SubscriptionRepository)]
pub struct SubscriptionRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl SubscriptionRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionRepositoryImpl {
    async fn find(&self, user_id: &str, course_id: &str) -> RehlaResult<Option<Subscription>> {
        match self.store.get(&paths::subscription(user_id, course_id)).await? {
            Some(document) => Ok(Some(decode(course_id, document)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self, user_id: &str) -> RehlaResult<Vec<Subscription>> {
        decode_all(self.store.list(&paths::subscriptions(user_id)).await?)
    }

    async fn save(&self, user_id: &str, subscription: &Subscription) -> RehlaResult<()> {
        self.store
            .set(&paths::subscription(user_id, &subscription.id), encode(subscription)?)
            .await
    }

    async fn update(&self, user_id: &str, course_id: &str, updates: &FieldUpdates) -> RehlaResult<()> {
        self.store
            .update(&paths::subscription(user_id, course_id), updates)
            .await
    }

    async fn delete(&self, user_id: &str, course_id: &str) -> RehlaResult<bool> {
        self.store.delete(&paths::subscription(user_id, course_id)).await
    }
}

/// Payment repository backed by the document store.
#[derive(Component)]
#[shaku(interface = PaymentRepository)]
pub struct PaymentRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl PaymentRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PaymentRepository for PaymentRepositoryImpl {
    async fn find_all(&self, user_id: &str, course_id: &str) -> RehlaResult<Vec<Payment>> {
        let mut payments: Vec<Payment> =
            decode_all(self.store.list(&paths::payments(user_id, course_id)).await?)?;
        sort_newest_first(&mut payments);
        Ok(payments)
    }

    async fn create(&self, user_id: &str, course_id: &str, payment: &Payment) -> RehlaResult<String> {
        self.store
            .create(&paths::payments(user_id, course_id), encode(payment)?)
            .await
    }

    async fn delete(&self, user_id: &str, course_id: &str, payment_id: &str) -> RehlaResult<bool> {
        self.store
            .delete(&paths::payments(user_id, course_id).doc(payment_id))
            .await
    }
}

/// Answer repository backed by the document store.
#[derive(Component)]
#[shaku(interface = AnswerRepository)]
pub struct AnswerRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl AnswerRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AnswerRepository for AnswerRepositoryImpl {
    async fn find(&self, user_id: &str, course_id: &str, exam_id: &str) -> RehlaResult<Option<Answer>> {
        match self.store.get(&paths::answers(user_id, course_id).doc(exam_id)).await? {
            Some(document) => Ok(Some(decode(exam_id, document)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self, user_id: &str, course_id: &str) -> RehlaResult<Vec<Answer>> {
        decode_all(self.store.list(&paths::answers(user_id, course_id)).await?)
    }

    async fn find_by_exam(&self, course_id: &str, exam_id: &str) -> RehlaResult<Vec<(User, Answer)>> {
        let users: Vec<User> = decode_all(self.store.list(&paths::users()).await?)?;
        let mut submitted = Vec::new();
        for user in users {
            let path = paths::answers(&user.id, course_id).doc(exam_id);
            if let Some(document) = self.store.get(&path).await? {
                let answer: Answer = decode(exam_id, document)?;
                submitted.push((user, answer));
            }
        }
        submitted.sort_by(|a, b| a.1.date_of_submission.cmp(&b.1.date_of_submission));
        Ok(submitted)
    }

    async fn save(&self, user_id: &str, answer: &Answer) -> RehlaResult<()> {
        self.store
            .set(&paths::answers(user_id, &answer.course_id).doc(&answer.id), encode(answer)?)
            .await
    }

    async fn update(&self, user_id: &str, course_id: &str, exam_id: &str, updates: &FieldUpdates) -> RehlaResult<()> {
        self.store
            .update(&paths::answers(user_id, course_id).doc(exam_id), updates)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::InMemoryDocumentStore;
    use chrono::{Duration, Utc};

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(InMemoryDocumentStore::new())
    }

    fn user(phone: &str, session: &str) -> User {
        User {
            firstname: "Sara".to_string(),
            lastname: "Hadi".to_string(),
            phone_number: phone.to_string(),
            session_id: session.to_string(),
            ..User::default()
        }
    }

    #[tokio::test]
    async fn test_find_by_phone_and_session() {
        let repo = UserRepositoryImpl::new(store());
        let id = repo.create(&user("07700000001", "tok-1")).await.unwrap();

        let by_phone = repo.find_by_phone("07700000001").await.unwrap().unwrap();
        assert_eq!(by_phone.id, id);
        let by_session = repo.find_by_session("tok-1").await.unwrap().unwrap();
        assert_eq!(by_session.id, id);
        assert!(repo.find_by_session("").await.unwrap().is_none());
        assert!(repo.find_by_session("tok-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_session_is_an_error() {
        let repo = UserRepositoryImpl::new(store());
        repo.create(&user("07700000001", "dup")).await.unwrap();
        repo.create(&user("07700000002", "dup")).await.unwrap();
        assert!(repo.find_by_session("dup").await.is_err());
    }

    #[tokio::test]
    async fn test_subscription_id_is_course_id() {
        let repo = SubscriptionRepositoryImpl::new(store());
        repo.save(
            "u1",
            &Subscription {
                id: "c1".to_string(),
                course_title: "Physics".to_string(),
                active: true,
            },
        )
        .await
        .unwrap();

        let sub = repo.find("u1", "c1").await.unwrap().unwrap();
        assert_eq!(sub.id, "c1");
        assert!(sub.active);
        assert_eq!(repo.find_all("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_payments_newest_first() {
        let repo = PaymentRepositoryImpl::new(store());
        let now = Utc::now();
        for (days_ago, amount) in [(40, 10), (2, 20), (20, 30)] {
            let date = now - Duration::days(days_ago);
            repo.create(
                "u1",
                "c1",
                &Payment {
                    id: String::new(),
                    amount_paid: amount,
                    date_of_payment: date,
                    valid_until: date + Duration::days(30),
                },
            )
            .await
            .unwrap();
        }

        let amounts: Vec<i64> = repo
            .find_all("u1", "c1")
            .await
            .unwrap()
            .iter()
            .map(|p| p.amount_paid)
            .collect();
        assert_eq!(amounts, vec![20, 30, 10]);
    }

    #[tokio::test]
    async fn test_find_answers_by_exam_across_users() {
        let store = store();
        let users = UserRepositoryImpl::new(store.clone());
        let answers = AnswerRepositoryImpl::new(store.clone());

        let u1 = users.create(&user("07700000001", "")).await.unwrap();
        let u2 = users.create(&user("07700000002", "")).await.unwrap();
        users.create(&user("07700000003", "")).await.unwrap();

        for uid in [&u1, &u2] {
            answers
                .save(
                    uid,
                    &Answer {
                        id: "e1".to_string(),
                        course_id: "c1".to_string(),
                        exam_title: "Quiz".to_string(),
                        storage_path: Answer::storage_path_for("c1", "e1", uid),
                        grade: 0,
                        out_of: 0,
                        notes: String::new(),
                        corrected: false,
                        date_of_submission: Utc::now(),
                        url: String::new(),
                    },
                )
                .await
                .unwrap();
        }

        let submitted = answers.find_by_exam("c1", "e1").await.unwrap();
        assert_eq!(submitted.len(), 2);
        assert!(submitted.iter().all(|(_, a)| a.id == "e1"));
    }
}
