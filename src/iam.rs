//! Identity management: user records and the OAuth 2.0 sign-in orchestration over them.

pub mod manager;
pub mod user;

pub use manager::*;
pub use user::*;
