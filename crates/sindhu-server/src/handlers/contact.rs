//! Contact form handlers

use crate::error::ApiError;
use crate::extractors::{AdminGuard, ValidatedJson};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sindhu_core::{ContactMessage, NewContactMessage};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    success: bool,
    message: &'static str,
    data: ContactMessage,
}

pub async fn submit(
    State(state): State<AppState>,
    ValidatedJson(new_message): ValidatedJson<NewContactMessage>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let message = state
        .store
        .create_contact_message(new_message)
        .await
        .map_err(ApiError::backend(
            "Failed to send message. Please try again later.",
        ))?;

    info!("Contact message {} received", message.id);
    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            message: "Your message has been sent successfully. We'll get back to you soon.",
            data: message,
        }),
    ))
}

/// Admin inbox
pub async fn messages(
    State(state): State<AppState>,
    _admin: AdminGuard,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    let messages = state
        .store
        .get_all_contact_messages()
        .await
        .map_err(ApiError::backend("Failed to fetch contact messages"))?;
    Ok(Json(messages))
}
