//! Product review handlers

use crate::error::{parse_id, ApiError};
use crate::extractors::ValidatedJson;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sindhu_core::{CatalogError, ProductReview, ReviewSubmission};

const INVALID_ID: &str = "Invalid product ID";

/// Reviews of one product; an unknown product simply has none
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductReview>>, ApiError> {
    let product_id = parse_id(&id, INVALID_ID)?;

    let reviews = state
        .store
        .get_product_reviews(product_id)
        .await
        .map_err(ApiError::backend("Failed to fetch reviews"))?;
    Ok(Json(reviews))
}

pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(submission): ValidatedJson<ReviewSubmission>,
) -> Result<(StatusCode, Json<ProductReview>), ApiError> {
    let product_id = parse_id(&id, INVALID_ID)?;

    match state
        .store
        .create_product_review(submission.for_product(product_id))
        .await
    {
        Ok(review) => Ok((StatusCode::CREATED, Json(review))),
        Err(CatalogError::ProductNotFound(_)) => Err(ApiError::NotFound("Product not found")),
        Err(e) => Err(ApiError::backend("Failed to create review")(e)),
    }
}
