//! Dashboard staff accounts and contact messages.

use super::codec::{decode, decode_all, encode};
use crate::dao::{paths, DocumentStore};
use crate::traits::{ContactRepository, DashboardUserRepository};
use async_trait::async_trait;
use rehla_core::{ContactMessage, DashboardUser, FieldUpdates, RehlaError, RehlaResult};
use serde_json::Value;
use shaku::Component;
use std::sync::Arc;

/// Staff repository backed by the document store.
#[derive(Component)]
#[shaku(interface = DashboardUserRepository)]
pub struct DashboardUserRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl DashboardUserRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn find_one_by(&self, field: &str, value: &str) -> RehlaResult<Option<DashboardUser>> {
        let mut matches = self
            .store
            .find_by_field(&paths::dashboard_users(), field, &Value::String(value.to_string()))
            .await?;
        if matches.len() > 1 {
            return Err(RehlaError::internal(format!(
                "More than one staff account with the same {}",
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
impl DashboardUserRepository for DashboardUserRepositoryImpl {
    async fn find_by_id(&self, staff_id: &str) -> RehlaResult<Option<DashboardUser>> {
        match self.store.get(&paths::dashboard_users().doc(staff_id)).await? {
            Some(document) => Ok(Some(decode(staff_id, document)?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> RehlaResult<Option<DashboardUser>> {
        self.find_one_by("username", username).await
    }

    async fn find_by_session(&self, session_id: &str) -> RehlaResult<Option<DashboardUser>> {
        if session_id.is_empty() {
            return Ok(None);
        }
        self.find_one_by("session_id", session_id).await
    }

    async fn find_all(&self) -> RehlaResult<Vec<DashboardUser>> {
        decode_all(self.store.list(&paths::dashboard_users()).await?)
    }

    async fn create(&self, staff: &DashboardUser) -> RehlaResult<String> {
        self.store.create(&paths::dashboard_users(), encode(staff)?).await
    }

    async fn update(&self, staff_id: &str, updates: &FieldUpdates) -> RehlaResult<()> {
        self.store
            .update(&paths::dashboard_users().doc(staff_id), updates)
            .await
    }

    async fn delete(&self, staff_id: &str) -> RehlaResult<bool> {
        self.store.delete(&paths::dashboard_users().doc(staff_id)).await
    }
}

/// Contact message repository backed by the document store.
#[derive(Component)]
#[shaku(interface = ContactRepository)]
pub struct ContactRepositoryImpl {
    #[shaku(inject)]
    store: Arc<dyn DocumentStore>,
}

impl ContactRepositoryImpl {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContactRepository for ContactRepositoryImpl {
    async fn create(&self, message: &ContactMessage) -> RehlaResult<String> {
        self.store.create(&paths::contacts(), encode(message)?).await
    }

    async fn find_all(&self) -> RehlaResult<Vec<ContactMessage>> {
        let mut messages: Vec<ContactMessage> =
            decode_all(self.store.list(&paths::contacts()).await?)?;
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::InMemoryDocumentStore;
    use chrono::Utc;
    use rehla_core::Role;

    #[tokio::test]
    async fn test_staff_lookup_by_username_and_session() {
        let repo = DashboardUserRepositoryImpl::new(Arc::new(InMemoryDocumentStore::new()));
        let id = repo
            .create(&DashboardUser {
                id: String::new(),
                username: "noor".to_string(),
                role: Role::Corrector,
                password_hash: "hash".to_string(),
                session_id: String::new(),
                course_ids: vec!["c1".to_string()],
            })
            .await
            .unwrap();

        repo.update(&id, &FieldUpdates::new().set("session_id", "staff-tok"))
            .await
            .unwrap();

        let staff = repo.find_by_username("noor").await.unwrap().unwrap();
        assert_eq!(staff.id, id);
        assert_eq!(staff.role, Role::Corrector);
        let by_session = repo.find_by_session("staff-tok").await.unwrap().unwrap();
        assert_eq!(by_session.course_ids, vec!["c1".to_string()]);
    }

    #[tokio::test]
    async fn test_contact_messages_ignore_unknown_id() {
        let repo = ContactRepositoryImpl::new(Arc::new(InMemoryDocumentStore::new()));
        repo.create(&ContactMessage {
            full_name: "Ali".to_string(),
            phone_number: "07700000001".to_string(),
            message: "Hello".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}
