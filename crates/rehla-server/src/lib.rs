//! # Rehla Server
//!
//! Process wiring shared by the `rehla-web` and `rehla-dashboard` binaries:
//! dependency injection modules, logging and metrics setup, and the serve
//! loop with graceful shutdown.

pub mod di;
pub mod startup;
