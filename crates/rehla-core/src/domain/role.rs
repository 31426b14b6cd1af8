//! Role value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an authenticated principal.
///
/// Subscribers of the web site are always `Student`; staff accounts of the
/// dashboard are `Admin` or `Corrector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Corrector,
    Admin,
}

impl Role {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Corrector => "corrector",
            Self::Admin => "admin",
        }
    }

    /// Returns true for staff roles.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Corrector | Self::Admin)
    }

    /// Checks if this role satisfies `required`. Admin satisfies corrector.
    #[must_use]
    pub const fn satisfies(&self, required: Self) -> bool {
        match (self, required) {
            (Self::Admin, _) => true,
            (Self::Corrector, Self::Corrector | Self::Student) => true,
            (Self::Student, Self::Student) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "corrector" => Ok(Self::Corrector),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_satisfies_corrector() {
        assert!(Role::Admin.satisfies(Role::Corrector));
        assert!(Role::Corrector.satisfies(Role::Corrector));
        assert!(!Role::Corrector.satisfies(Role::Admin));
        assert!(!Role::Student.satisfies(Role::Corrector));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert!("owner".parse::<Role>().is_err());
    }
}
