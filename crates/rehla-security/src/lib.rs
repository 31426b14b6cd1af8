//! # Rehla Security
//!
//! Security module for Rehla providing password hashing, request principals
//! and the per-request authorization state machine:
//!
//! ```text
//! Anonymous ──session token resolves──▶ Authenticated(principal)
//!                                            │
//!                       requirement met ─────┘──▶ Authorized(principal, grant)
//! ```

pub mod auth;
pub mod password;

pub use auth::*;
pub use password::*;
pub use rehla_core::SessionToken;
