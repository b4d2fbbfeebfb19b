//! Testimonial handlers

use super::MessageResponse;
use crate::error::{parse_id, ApiError};
use crate::extractors::{AdminGuard, ValidatedJson};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sindhu_core::{NewTestimonial, Testimonial, TestimonialPatch};

const INVALID_ID: &str = "Invalid testimonial ID";
const NOT_FOUND: &str = "Testimonial not found";

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>, ApiError> {
    let testimonials = state
        .store
        .get_all_testimonials()
        .await
        .map_err(ApiError::backend("Failed to fetch testimonials"))?;
    Ok(Json(testimonials))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminGuard,
    ValidatedJson(new_testimonial): ValidatedJson<NewTestimonial>,
) -> Result<(StatusCode, Json<Testimonial>), ApiError> {
    let testimonial = state
        .store
        .create_testimonial(new_testimonial)
        .await
        .map_err(ApiError::backend("Failed to create testimonial"))?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminGuard,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<TestimonialPatch>,
) -> Result<Json<Testimonial>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;

    state
        .store
        .update_testimonial(id, patch)
        .await
        .map_err(ApiError::backend("Failed to update testimonial"))?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminGuard,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;

    if !state
        .store
        .delete_testimonial(id)
        .await
        .map_err(ApiError::backend("Failed to delete testimonial"))?
    {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    Ok(Json(MessageResponse {
        message: "Testimonial deleted successfully",
    }))
}
