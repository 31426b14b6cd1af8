//! Repository layer implementations.
//!
//! Trait definitions live in the parent module (`traits.rs`).
//! This module contains concrete structs that implement those traits.

mod codec;
pub mod course_repository_impl;
pub mod staff_repository_impl;
pub mod user_repository_impl;

pub use course_repository_impl::{
    CourseRepositoryImpl, ExamRepositoryImpl, LectureRepositoryImpl, MaterialRepositoryImpl,
};
pub use staff_repository_impl::{ContactRepositoryImpl, DashboardUserRepositoryImpl};
pub use user_repository_impl::{
    AnswerRepositoryImpl, PaymentRepositoryImpl, SubscriptionRepositoryImpl, UserRepositoryImpl,
};
