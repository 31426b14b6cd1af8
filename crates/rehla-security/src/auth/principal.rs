//! The identity a session token resolves to.

use rehla_core::{DashboardUser, Role, User};
use serde::{Deserialize, Serialize};

/// An authenticated subscriber or staff member.
///
/// This is what the session cache stores, so it carries only what the
/// authorization chain and the views need, never credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    /// Courses a corrector may grade.
    #[serde(default)]
    pub course_ids: Vec<String>,
}

impl Principal {
    /// Returns true for admins.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true when this principal may grade answers of `course_id`.
    #[must_use]
    pub fn can_correct(&self, course_id: &str) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Corrector => self.course_ids.iter().any(|id| id == course_id),
            Role::Student => false,
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.full_name(),
            role: Role::Student,
            course_ids: Vec::new(),
        }
    }
}

impl From<&DashboardUser> for Principal {
    fn from(staff: &DashboardUser) -> Self {
        Self {
            user_id: staff.id.clone(),
            name: staff.username.clone(),
            role: staff.role,
            course_ids: staff.course_ids.clone(),
        }
    }
}
