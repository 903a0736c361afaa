use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// `Json` with the default rejection swapped for the error envelope: a body
/// that fails to parse answers 400 `{"error": "Input ga valid"}` instead of
/// axum's plain-text 422 with serde detail.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rej| {
            warn!(rejection = %rej, "json body rejected");
            ApiError::InvalidInput
        })?;
        Ok(Self(value))
    }
}

/// `Multipart` behind the same envelope.
pub struct AppMultipart(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mp = Multipart::from_request(req, state).await.map_err(|rej| {
            warn!(rejection = %rej, "multipart body rejected");
            ApiError::InvalidInput
        })?;
        Ok(Self(mp))
    }
}

/// `Path` behind the same envelope; a non-numeric report id is client error,
/// not a bare 400 text body.
pub struct AppPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rej| {
                warn!(rejection = %rej, "path rejected");
                ApiError::InvalidInput
            })?;
        Ok(Self(value))
    }
}
