//! Product types

use crate::coerce;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A catalog product. Prices are integer minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: i64,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub discount_price: Option<i64>,
    #[serde(default)]
    pub stock_count: i64,
}

impl Product {
    /// Build the stored record for a freshly assigned id
    pub fn from_new(id: i64, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            image_url: new.image_url,
            additional_images: new.additional_images,
            featured: new.featured,
            discount_price: new.discount_price,
            stock_count: new.stock_count,
        }
    }

    /// Price the customer pays: the discount when one is set
    pub fn effective_price(&self) -> i64 {
        self.discount_price.unwrap_or(self.price)
    }

    /// Merge the supplied fields of a patch; the id never changes.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(additional_images) = patch.additional_images {
            self.additional_images = additional_images;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        if let Some(discount_price) = patch.discount_price {
            self.discount_price = discount_price;
        }
        if let Some(stock_count) = patch.stock_count {
            self.stock_count = stock_count;
        }
    }

    /// Copy of this product with the patch applied
    pub fn merged(&self, patch: &ProductPatch) -> Self {
        let mut product = self.clone();
        product.apply(patch.clone());
        product
    }

    /// Apply a patch only when the merged record still satisfies
    /// [`check_discount`]; on error `self` is left untouched.
    pub fn try_apply(&mut self, patch: ProductPatch) -> Result<(), PricingError> {
        let mut next = self.clone();
        next.apply(patch);
        check_discount(next.price, next.discount_price)?;
        *self = next;
        Ok(())
    }
}

/// Product creation payload (all fields except the id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "coerce::int")]
    #[validate(range(min = 1, message = "Price must be a positive integer"))]
    pub price: i64,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, deserialize_with = "coerce::optional_int")]
    pub discount_price: Option<i64>,
    #[serde(default, deserialize_with = "coerce::int")]
    #[validate(range(min = 0, message = "Stock count cannot be negative"))]
    pub stock_count: i64,
}

impl NewProduct {
    pub fn check_pricing(&self) -> Result<(), PricingError> {
        check_discount(self.price, self.discount_price)
    }
}

/// Partial product update. `None` leaves a field untouched; for the
/// nullable fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::patch")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "coerce::optional_int")]
    #[validate(range(min = 1, message = "Price must be a positive integer"))]
    pub price: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "coerce::patch")]
    pub image_url: Option<Option<String>>,
    #[serde(default)]
    pub additional_images: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "coerce::patch_int")]
    pub discount_price: Option<Option<i64>>,
    #[serde(default, deserialize_with = "coerce::optional_int")]
    #[validate(range(min = 0, message = "Stock count cannot be negative"))]
    pub stock_count: Option<i64>,
}

/// Violations of the discount invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingError {
    NonPositiveDiscount,
    DiscountNotBelowPrice,
}

impl PricingError {
    pub fn field(&self) -> &'static str {
        "discountPrice"
    }

    pub fn message(&self) -> &'static str {
        match self {
            PricingError::NonPositiveDiscount => "Discount price must be a positive integer",
            PricingError::DiscountNotBelowPrice => "Discount price must be less than the price",
        }
    }
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// A discount, when present, must be positive and strictly below the price.
pub fn check_discount(price: i64, discount_price: Option<i64>) -> Result<(), PricingError> {
    match discount_price {
        Some(discount) if discount <= 0 => Err(PricingError::NonPositiveDiscount),
        Some(discount) if discount >= price => Err(PricingError::DiscountNotBelowPrice),
        _ => Ok(()),
    }
}
