//! Domain entities of the course platform.

pub mod answer;
pub mod contact;
pub mod course;
pub mod enrollment;
pub mod role;
pub mod user;

pub use answer::*;
pub use contact::*;
pub use course::*;
pub use enrollment::*;
pub use role::*;
pub use user::*;
