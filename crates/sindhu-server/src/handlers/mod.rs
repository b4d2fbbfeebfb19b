//! HTTP handlers

pub mod auth;
pub mod contact;
pub mod health;
pub mod products;
pub mod reviews;
pub mod testimonials;

pub use health::health;

use serde::Serialize;

/// `{"message": ...}` body for confirmations
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
