//! # Rehla Service
//!
//! Business logic for the web site and the dashboard. Services read through
//! the cache, write to the authoritative store and invalidate what they
//! touched.

pub mod account_service;
pub mod answer_service;
pub mod cache;
pub mod cache_admin_service;
pub mod course_service;
pub mod dto;
pub mod enrollment_service;
pub mod r#impl;
pub mod session_service;

#[cfg(test)]
mod test_support;

pub use account_service::*;
pub use answer_service::*;
pub use cache::*;
pub use cache_admin_service::*;
pub use course_service::*;
pub use dto::*;
pub use enrollment_service::*;
pub use r#impl::*;
pub use session_service::*;
