//! Middleware shared by both backends.

mod guards;
mod logging;
mod security;
mod session;

pub use guards::*;
pub use logging::*;
pub use security::*;
pub use session::*;
