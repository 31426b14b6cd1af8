//! Cache key scheme.
//!
//! Every key starts with a type discriminator (`course:`, `courses`,
//! `session:`, `dashboard_session:`), so keys of different entity types
//! never collide. Ids containing the `:` separator could forge another
//! key's shape; such keys are never read from or written to the cache.

use std::fmt;

/// A cacheable entity or aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Course { course_id: String },
    Courses,
    Lecture { course_id: String, lecture_id: String },
    Lectures { course_id: String },
    Exam { course_id: String, exam_id: String },
    Exams { course_id: String },
    Materials { course_id: String },
    Session { token: String },
    DashboardSession { token: String },
}

impl CacheKey {
    #[must_use]
    pub fn course(course_id: &str) -> Self {
        Self::Course {
            course_id: course_id.to_string(),
        }
    }

    #[must_use]
    pub fn lecture(course_id: &str, lecture_id: &str) -> Self {
        Self::Lecture {
            course_id: course_id.to_string(),
            lecture_id: lecture_id.to_string(),
        }
    }

    #[must_use]
    pub fn lectures(course_id: &str) -> Self {
        Self::Lectures {
            course_id: course_id.to_string(),
        }
    }

    #[must_use]
    pub fn exam(course_id: &str, exam_id: &str) -> Self {
        Self::Exam {
            course_id: course_id.to_string(),
            exam_id: exam_id.to_string(),
        }
    }

    #[must_use]
    pub fn exams(course_id: &str) -> Self {
        Self::Exams {
            course_id: course_id.to_string(),
        }
    }

    #[must_use]
    pub fn materials(course_id: &str) -> Self {
        Self::Materials {
            course_id: course_id.to_string(),
        }
    }

    #[must_use]
    pub fn session(token: &str) -> Self {
        Self::Session {
            token: token.to_string(),
        }
    }

    #[must_use]
    pub fn dashboard_session(token: &str) -> Self {
        Self::DashboardSession {
            token: token.to_string(),
        }
    }

    /// Renders the key stored in the cache.
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::Course { course_id } => format!("course:{}", course_id),
            Self::Courses => "courses".to_string(),
            Self::Lecture {
                course_id,
                lecture_id,
            } => format!("course:{}:lec:{}", course_id, lecture_id),
            Self::Lectures { course_id } => format!("course:{}:lecs", course_id),
            Self::Exam { course_id, exam_id } => format!("course:{}:exam:{}", course_id, exam_id),
            Self::Exams { course_id } => format!("course:{}:exams", course_id),
            Self::Materials { course_id } => format!("course:{}:mats", course_id),
            Self::Session { token } => format!("session:{}", token),
            Self::DashboardSession { token } => format!("dashboard_session:{}", token),
        }
    }

    /// False when an id contains the `:` separator.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        let ids: [&str; 2] = match self {
            Self::Courses => return true,
            Self::Course { course_id }
            | Self::Lectures { course_id }
            | Self::Exams { course_id }
            | Self::Materials { course_id } => [course_id, ""],
            Self::Lecture { course_id, lecture_id } => [course_id, lecture_id],
            Self::Exam { course_id, exam_id } => [course_id, exam_id],
            Self::Session { token } | Self::DashboardSession { token } => [token, ""],
        };
        ids.iter().all(|id| !id.contains(':'))
    }

    /// The aggregate list invalidated together with a single-entity key.
    #[must_use]
    pub fn parent_list(&self) -> Option<Self> {
        match self {
            Self::Course { .. } => Some(Self::Courses),
            Self::Lecture { course_id, .. } => Some(Self::lectures(course_id)),
            Self::Exam { course_id, .. } => Some(Self::exams(course_id)),
            _ => None,
        }
    }

    /// The course a key is scoped to.
    #[must_use]
    pub fn course_id(&self) -> Option<&str> {
        match self {
            Self::Course { course_id }
            | Self::Lecture { course_id, .. }
            | Self::Lectures { course_id }
            | Self::Exam { course_id, .. }
            | Self::Exams { course_id }
            | Self::Materials { course_id } => Some(course_id),
            _ => None,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}
