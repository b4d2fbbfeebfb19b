//! Product review types

use crate::coerce;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReview {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub rating: i64,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

impl ProductReview {
    pub fn from_new(id: i64, new: NewProductReview, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            product_id: new.product_id,
            name: new.name,
            rating: new.rating,
            review: new.review,
            created_at,
        }
    }
}

/// Review form body; the product comes from the URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReviewSubmission {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[serde(deserialize_with = "coerce::int")]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,
    #[validate(length(min = 10, message = "Review must be at least 10 characters"))]
    pub review: String,
}

impl ReviewSubmission {
    pub fn for_product(self, product_id: i64) -> NewProductReview {
        NewProductReview {
            product_id,
            name: self.name,
            rating: self.rating,
            review: self.review,
        }
    }
}

/// Store input for a review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductReview {
    pub product_id: i64,
    pub name: String,
    pub rating: i64,
    pub review: String,
}
