//! Sindhu Types - Pure catalog record and request payload definitions
//!
//! Shared between the storage backends, the HTTP layer and the client cart.
//! Field names go over the wire in camelCase.

pub mod coerce;
pub mod contact;
pub mod product;
pub mod review;
pub mod testimonial;
pub mod user;

pub use contact::*;
pub use product::*;
pub use review::*;
pub use testimonial::*;
pub use user::*;
