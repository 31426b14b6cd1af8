//! Service implementations.
//!
//! Trait definitions live in the parent modules (e.g. `course_service.rs`).

pub mod account_service_impl;
pub mod answer_service_impl;
pub mod cache_admin_service_impl;
pub mod content_service_impl;
pub mod course_service_impl;
pub mod enrollment_service_impl;
pub mod session_service_impl;

pub use account_service_impl::{AccountServiceImpl, DashboardAccountServiceImpl};
pub use answer_service_impl::AnswerServiceImpl;
pub use cache_admin_service_impl::CacheAdminServiceImpl;
pub use content_service_impl::{ExamServiceImpl, MaterialServiceImpl};
pub use course_service_impl::{CourseServiceImpl, LectureServiceImpl};
pub use enrollment_service_impl::EnrollmentServiceImpl;
pub use session_service_impl::{DashboardSessionResolver, WebSessionResolver};
