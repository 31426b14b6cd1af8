//! # Rehla REST
//!
//! Axum routers for the public web site and the staff dashboard.
//!
//! Both backends share the same outer chain:
//!
//! ```text
//! catch panic → trace → request log + metrics → security headers → timeout
//!   → session resolution → guards → handler
//! ```

pub mod dashboard;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;
pub mod views;
pub mod web;

pub use router::*;
pub use state::*;
