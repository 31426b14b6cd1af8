//! # Rehla Core
//!
//! Core types, domain entities, and error definitions for Rehla.
//! Every other crate of the workspace builds on the types defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod patch;
pub mod result;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use patch::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
