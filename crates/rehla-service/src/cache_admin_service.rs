//! Admin-triggered cache rebuilds.

use async_trait::async_trait;
use rehla_core::{Interface, RehlaResult};

/// Cache administration service trait.
#[async_trait]
pub trait CacheAdminService: Interface + Send + Sync {
    /// Returns true when a cache backend is configured.
    fn is_enabled(&self) -> bool;

    /// Rewrites a course entry and the course list from the store.
    async fn refresh_course(&self, course_id: &str) -> RehlaResult<()>;

    /// Rewrites every lecture entry of a course and its lecture list.
    async fn refresh_lectures(&self, course_id: &str) -> RehlaResult<usize>;

    /// Rewrites every exam entry of a course and its exam list.
    async fn refresh_exams(&self, course_id: &str) -> RehlaResult<usize>;

    /// Rewrites the material list of a course.
    async fn refresh_materials(&self, course_id: &str) -> RehlaResult<usize>;
}
