//! Request extractors

pub mod auth;
pub mod json;

pub use auth::{AdminGuard, AuthUser};
pub use json::{Payload, ValidatedJson};
