//! Testimonial types

use crate::coerce;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer testimonial shown on the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// 1 to 5 stars
    pub rating: i64,
    pub review: String,
}

impl Testimonial {
    pub fn from_new(id: i64, new: NewTestimonial) -> Self {
        Self {
            id,
            name: new.name,
            location: new.location,
            rating: new.rating,
            review: new.review,
        }
    }

    pub fn apply(&mut self, patch: TestimonialPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(review) = patch.review {
            self.review = review;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewTestimonial {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[serde(deserialize_with = "coerce::int")]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,
    #[validate(length(min = 1, message = "Review is required"))]
    pub review: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TestimonialPatch {
    #[serde(default)]
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "coerce::optional_int")]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Review cannot be empty"))]
    pub review: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let new = NewTestimonial {
                name: "Priya".to_string(),
                location: "Delhi".to_string(),
                rating,
                review: "Lovely sofa".to_string(),
            };
            assert_eq!(new.validate().is_ok(), ok, "rating {}", rating);
        }
    }
}
