use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Application-level error type. Everything a handler can fail with maps to
/// one HTTP status and a JSON `{"error": "..."}` body; internal detail
/// (driver errors, stack traces) never reaches the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Input ga valid")]
    InvalidInput,

    #[error("Foto wajib diupload!")]
    MissingPhoto,

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Token Invalid")]
    InvalidToken,

    #[error("Email atau Password salah")]
    InvalidCredentials,

    #[error("Akses ditolak")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Email sudah terdaftar")]
    DuplicateEmail,

    #[error("Gagal upload ke Storage")]
    StorageUnavailable,

    #[error("Terjadi kesalahan pada server")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput | ApiError::MissingPhoto => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated
            | ApiError::InvalidToken
            | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateEmail
            | ApiError::StorageUnavailable
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(ref e) = self {
            tracing::error!(error = %e, "internal server error");
        }
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::DuplicateEmail,
            e => ApiError::Internal(e.into()),
        }
    }
}
