//! Custom Axum extractors.

mod auth;
mod multipart;
mod validated;

pub use auth::*;
pub use multipart::*;
pub use validated::*;
