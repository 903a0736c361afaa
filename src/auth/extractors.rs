use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::services::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;

/// Request gate for protected routes: extracts and verifies the bearer
/// token, handing the verified identity to the handler.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: String,
}

impl AuthUser {
    /// Only staff may resolve or delete reports.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        match self.role.as_str() {
            "admin" | "petugas" => Ok(()),
            _ => Err(ApiError::Forbidden),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthenticated)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::InvalidToken
        })?;

        Ok(AuthUser {
            user_id: claims.user_id,
            role: claims.role,
        })
    }
}
