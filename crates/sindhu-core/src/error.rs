//! Error types for the catalog store

use sindhu_types::PricingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failures a catalog store reports. Unknown ids are not errors; lookups
/// return `None` for those.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// The write would leave a discount that is not positive or not below the price
    #[error("Invalid pricing: {0}")]
    Pricing(PricingError),

    #[error("Cart total exceeds the representable range")]
    TotalOverflow,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Serialization(e.to_string())
    }
}

impl From<PricingError> for CatalogError {
    fn from(e: PricingError) -> Self {
        CatalogError::Pricing(e)
    }
}
