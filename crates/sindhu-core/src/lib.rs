//! Sindhu Core Library
//!
//! Catalog store ports, the store error type, and the client-side cart.

// Re-export pure types from sindhu-types
pub use sindhu_types::*;

pub mod cart;
pub mod error;
pub mod ports;

pub use cart::{AddOutcome, Cart, CartEvent, CartStorage, FileCartStorage, MemoryCartStorage};
pub use error::{CatalogError, Result};
pub use ports::CatalogStore;
