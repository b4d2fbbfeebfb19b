//! JSON body extractor with validation

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use sindhu_core::{
    NewContactMessage, NewProduct, NewTestimonial, ProductPatch, ReviewSubmission,
    TestimonialPatch,
};
use validator::Validate;

/// A request body type and the headline used when it fails validation
pub trait Payload {
    const INVALID: &'static str;
}

impl Payload for NewProduct {
    const INVALID: &'static str = "Invalid product data";
}

impl Payload for ProductPatch {
    const INVALID: &'static str = "Invalid product data";
}

impl Payload for ReviewSubmission {
    const INVALID: &'static str = "Invalid review data";
}

impl Payload for NewContactMessage {
    const INVALID: &'static str = "Invalid contact form data";
}

impl Payload for NewTestimonial {
    const INVALID: &'static str = "Invalid testimonial data";
}

impl Payload for TestimonialPatch {
    const INVALID: &'static str = "Invalid testimonial data";
}

/// Deserializes a JSON body and runs its `validator` rules. Both malformed
/// JSON and rule violations become a 400 with field detail.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Payload,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::malformed_body(T::INVALID, rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::validation(T::INVALID, &errors))?;

        Ok(ValidatedJson(value))
    }
}
