//! Principals, request auth context and requirement evaluation.

mod context;
mod principal;
mod requirement;

pub use context::*;
pub use principal::*;
pub use requirement::*;
