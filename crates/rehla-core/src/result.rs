//! Result type aliases for Rehla.

use crate::RehlaError;

/// A specialized `Result` type for Rehla operations.
pub type RehlaResult<T> = Result<T, RehlaError>;
