//! Hierarchical document paths.
//!
//! Documents live in collections, and documents may own sub-collections:
//!
//! ```text
//! courses/{courseId}
//!   lecs/{lecId}  exams/{examId}  materials/{materialId}
//! users/{userId}
//!   subs/{courseId}
//!     payments/{paymentId}  answers/{examId}
//! dashboard_users/{staffId}
//! contacts/{messageId}
//! ```

use std::fmt;

/// Path to a collection: an odd number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

/// Path to a document: an even number of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath(String);

impl CollectionPath {
    /// A top-level collection.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The document `id` inside this collection.
    #[must_use]
    pub fn doc(&self, id: &str) -> DocumentPath {
        DocumentPath(format!("{}/{}", self.0, id))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocumentPath {
    /// A sub-collection of this document.
    #[must_use]
    pub fn collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{}", self.0, name))
    }

    /// The last segment: the document id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// The collection holding this document.
    #[must_use]
    pub fn parent(&self) -> CollectionPath {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => CollectionPath(parent.to_string()),
            None => CollectionPath(String::new()),
        }
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path builders for every collection of the platform.
pub mod paths {
    use super::{CollectionPath, DocumentPath};

    #[must_use]
    pub fn courses() -> CollectionPath {
        CollectionPath::root("courses")
    }

    #[must_use]
    pub fn course(course_id: &str) -> DocumentPath {
        courses().doc(course_id)
    }

    #[must_use]
    pub fn lectures(course_id: &str) -> CollectionPath {
        course(course_id).collection("lecs")
    }

    #[must_use]
    pub fn exams(course_id: &str) -> CollectionPath {
        course(course_id).collection("exams")
    }

    #[must_use]
    pub fn materials(course_id: &str) -> CollectionPath {
        course(course_id).collection("materials")
    }

    #[must_use]
    pub fn users() -> CollectionPath {
        CollectionPath::root("users")
    }

    #[must_use]
    pub fn user(user_id: &str) -> DocumentPath {
        users().doc(user_id)
    }

    #[must_use]
    pub fn subscriptions(user_id: &str) -> CollectionPath {
        user(user_id).collection("subs")
    }

    #[must_use]
    pub fn subscription(user_id: &str, course_id: &str) -> DocumentPath {
        subscriptions(user_id).doc(course_id)
    }

    #[must_use]
    pub fn payments(user_id: &str, course_id: &str) -> CollectionPath {
        subscription(user_id, course_id).collection("payments")
    }

    #[must_use]
    pub fn answers(user_id: &str, course_id: &str) -> CollectionPath {
        subscription(user_id, course_id).collection("answers")
    }

    #[must_use]
    pub fn dashboard_users() -> CollectionPath {
        CollectionPath::root("dashboard_users")
    }

    #[must_use]
    pub fn contacts() -> CollectionPath {
        CollectionPath::root("contacts")
    }
}

#[cfg(test)]
mod tests {
    use super::paths;

    #[test]
    fn test_nested_paths() {
        let answer = paths::answers("u1", "c1").doc("e1");
        assert_eq!(answer.as_str(), "users/u1/subs/c1/answers/e1");
        assert_eq!(answer.id(), "e1");
        assert_eq!(answer.parent().as_str(), "users/u1/subs/c1/answers");
    }

    #[test]
    fn test_course_children() {
        assert_eq!(paths::lectures("c1").doc("l1").as_str(), "courses/c1/lecs/l1");
        assert_eq!(paths::exams("c1").as_str(), "courses/c1/exams");
        assert_eq!(paths::materials("c1").as_str(), "courses/c1/materials");
    }
}
