//! Subscriber accounts and staff accounts.

use super::role::Role;
use crate::patch::FieldUpdates;
use serde::{Deserialize, Serialize};

/// A subscriber of the public web site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    #[serde(default)]
    pub parent_phone_number: String,
    #[serde(default)]
    pub password_hash: String,
    /// Token of the current session; empty when logged out.
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub img_path: String,
}

impl User {
    /// Display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Object storage path of the profile image.
    #[must_use]
    pub fn image_path(user_id: &str) -> String {
        format!("users/{}/profile", user_id)
    }
}

/// Partial update of a subscriber.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone_number: Option<String>,
    pub parent_phone_number: Option<String>,
    /// Already hashed. Services hash plain passwords before building the patch.
    #[serde(skip)]
    pub password_hash: Option<String>,
    #[serde(skip)]
    pub session_id: Option<String>,
    #[serde(skip)]
    pub img_url: Option<String>,
    #[serde(skip)]
    pub img_path: Option<String>,
}

impl From<UserPatch> for FieldUpdates {
    fn from(patch: UserPatch) -> Self {
        FieldUpdates::new()
            .set_opt("firstname", patch.firstname)
            .set_opt("lastname", patch.lastname)
            .set_opt("phone_number", patch.phone_number)
            .set_opt("parent_phone_number", patch.parent_phone_number)
            .set_opt("password_hash", patch.password_hash)
            .set_opt("session_id", patch.session_id)
            .set_opt("img_url", patch.img_url)
            .set_opt("img_path", patch.img_path)
    }
}

/// A staff account of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardUser {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub session_id: String,
    /// Courses a corrector may grade. Ignored for admins.
    #[serde(default)]
    pub course_ids: Vec<String>,
}

/// Partial update of a staff account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardUserPatch {
    pub role: Option<Role>,
    pub course_ids: Option<Vec<String>>,
    #[serde(skip)]
    pub password_hash: Option<String>,
    #[serde(skip)]
    pub session_id: Option<String>,
}

impl From<DashboardUserPatch> for FieldUpdates {
    fn from(patch: DashboardUserPatch) -> Self {
        FieldUpdates::new()
            .set_opt("role", patch.role.map(|r| r.as_str()))
            .set_opt("course_ids", patch.course_ids)
            .set_opt("password_hash", patch.password_hash)
            .set_opt("session_id", patch.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_patch_carries_hidden_fields() {
        let patch = UserPatch {
            session_id: Some(String::new()),
            ..UserPatch::default()
        };
        let updates: FieldUpdates = patch.into();
        assert_eq!(updates.get("session_id"), Some(&json!("")));
    }

    #[test]
    fn test_dashboard_user_role_serializes_lowercase() {
        let staff = DashboardUser {
            id: "s1".to_string(),
            username: "noor".to_string(),
            role: Role::Corrector,
            password_hash: String::new(),
            session_id: String::new(),
            course_ids: vec!["c1".to_string()],
        };
        let value = serde_json::to_value(&staff).unwrap();
        assert_eq!(value["role"], json!("corrector"));
    }

    #[test]
    fn test_dashboard_patch_role() {
        let updates: FieldUpdates = DashboardUserPatch {
            role: Some(Role::Admin),
            ..DashboardUserPatch::default()
        }
        .into();
        assert_eq!(updates.get("role"), Some(&json!("admin")));
    }
}
