//! Authentication handlers

use crate::error::ApiError;
use crate::extractors::{AuthUser, Payload, ValidatedJson};
use crate::services::AuthError;
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    password: String,
}

impl Payload for LoginRequest {
    const INVALID: &'static str = "Invalid login data";
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    access_token: String,
    expires_in: i64,
    user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    id: i64,
    username: String,
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    info!("Login attempt for: {}", req.username);

    let tokens = match state.auth_service.login(&req.username, &req.password).await {
        Ok(tokens) => tokens,
        Err(AuthError::InvalidCredentials) => {
            warn!("Login failed for: {}", req.username);
            return Err(ApiError::Unauthorized("Invalid username or password"));
        }
        Err(e) => {
            error!("Login error: {}", e);
            return Err(ApiError::Internal("Failed to log in"));
        }
    };

    let user = state
        .auth_service
        .authenticate(&tokens.access_token)
        .await
        .map_err(|e| {
            error!("Freshly issued token did not verify: {}", e);
            ApiError::Internal("Failed to log in")
        })?;

    info!("Login successful for: {}", user.username);

    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        expires_in: tokens.expires_in,
        user: UserInfo {
            id: user.id,
            username: user.username,
        },
    }))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        username: user.username,
    })
}
