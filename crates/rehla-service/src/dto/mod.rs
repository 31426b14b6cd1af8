//! Data transfer objects accepted by the services.

mod account_dto;
mod course_dto;
mod upload;

pub use account_dto::*;
pub use course_dto::*;
pub use upload::*;
