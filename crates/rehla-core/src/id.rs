//! Document identifiers and session tokens.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

/// Generates a new document id: 32 lowercase hex characters.
#[must_use]
pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Opaque session token carried in the session cookie.
///
/// The token is the only thing the client holds; identity lives server-side
/// under `session:<token>` in the cache and in the owner's `session_id` field
/// in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Creates a fresh random token with 256 bits of entropy.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    /// Wraps a token read from a cookie. Blank values are rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_shape() {
        let id = new_document_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_document_id());
    }

    #[test]
    fn test_session_token_generate() {
        let token = SessionToken::generate();
        assert_eq!(token.as_str().len(), 64);
        assert_ne!(token, SessionToken::generate());
    }

    #[test]
    fn test_session_token_parse() {
        assert!(SessionToken::parse("   ").is_none());
        assert_eq!(SessionToken::parse(" abc ").map(SessionToken::into_inner), Some("abc".to_string()));
    }
}
