//! Auth extractors for admin routes

use crate::error::ApiError;
use crate::services::AuthError;
use crate::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sindhu_core::User;
use tracing::{error, warn};

/// The user behind a valid bearer token
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        // Get Authorization header
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized("Missing Authorization header"))?;

        // Extract Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid Authorization format"))?;

        match state.auth_service.authenticate(token).await {
            Ok(user) => Ok(AuthUser(user)),
            Err(AuthError::Catalog(e)) => {
                error!("Failed to resolve token user: {}", e);
                Err(ApiError::Internal("Failed to verify credentials"))
            }
            Err(e) => {
                warn!("Rejected admin token: {}", e);
                Err(ApiError::Unauthorized("Invalid or expired token"))
            }
        }
    }
}

/// Gate for admin-only routes. A no-op unless `require_admin_auth` is set,
/// in which case it demands an [`AuthUser`].
#[derive(Clone, Debug)]
pub struct AdminGuard(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        if !state.config.require_admin_auth {
            return Ok(AdminGuard(None));
        }
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        Ok(AdminGuard(Some(user)))
    }
}
