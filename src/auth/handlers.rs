use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};

use crate::extract::AppJson;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{CredentialsRequest, TokenResponse},
    repo::User,
    services::{hash_password, is_valid_email, verify_password, JwtKeys},
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !is_valid_email(&payload.email) || payload.password.is_empty() {
        warn!(email = %payload.email, "register rejected, invalid input");
        return Err(ApiError::InvalidInput);
    }

    let hash = hash_password(&payload.password)?;

    // The unique index on email decides the duplicate case; no pre-check.
    let user = User::create(&state.db, &payload.email, &hash).await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Json(json!({ "message": "Register sukses!", "data": user })))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Unknown email and wrong password collapse into the same error so the
    // response never leaks which check failed.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).sign(user.id, &user.role)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}
