use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{delete, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{AppMultipart, AppPath};
use crate::state::AppState;
use crate::waste::dto::{NewReport, PhotoUpload, WasteListItem};
use crate::waste::repo::Waste;
use crate::waste::services::create_report;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waste", post(create_waste).get(list_wastes))
        .route("/waste/:id/status", put(update_status))
        .route("/waste/:id", delete(delete_waste))
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024)) // 50MB, photos included
}

/// POST /waste (multipart: jenis, berat, foto)
#[instrument(skip(state, mp))]
pub async fn create_waste(
    State(state): State<AppState>,
    user: AuthUser,
    AppMultipart(mut mp): AppMultipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let mut jenis: Option<String> = None;
    let mut berat: Option<f64> = None;
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = mp.next_field().await.map_err(|_| ApiError::InvalidInput)? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("jenis") => {
                jenis = Some(field.text().await.map_err(|_| ApiError::InvalidInput)?);
            }
            Some("berat") => {
                let text = field.text().await.map_err(|_| ApiError::InvalidInput)?;
                berat = Some(
                    text.trim()
                        .parse::<f64>()
                        .map_err(|_| ApiError::InvalidInput)?,
                );
            }
            Some("foto") => {
                let filename = field.file_name().unwrap_or("foto").to_string();
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let bytes = field.bytes().await.map_err(|_| ApiError::InvalidInput)?;
                photo = Some(PhotoUpload {
                    bytes,
                    content_type,
                    filename,
                });
            }
            _ => {}
        }
    }

    let input = match (jenis, berat) {
        (Some(jenis), Some(berat)) => NewReport { jenis, berat },
        _ => return Err(ApiError::InvalidInput),
    };
    let photo = photo.ok_or(ApiError::MissingPhoto)?;

    let waste = create_report(&state, user.user_id, input, photo).await?;

    info!(waste_id = waste.id, user_id = user.user_id, "report created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Laporan sukses & WA terkirim!", "data": waste })),
    ))
}

/// GET /waste
#[instrument(skip(state, _user))]
pub async fn list_wastes(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rows = Waste::list_with_owner(&state.db).await?;
    let items: Vec<WasteListItem> = rows.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "data": items })))
}

/// PUT /waste/:id/status
#[instrument(skip(state, user))]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    user.require_staff()?;

    let waste = Waste::set_done(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Data sampah tidak ditemukan"))?;

    info!(waste_id = id, by = user.user_id, "report resolved");
    Ok(Json(json!({
        "message": "Status berhasil diupdate jadi Selesai!",
        "data": waste,
    })))
}

/// DELETE /waste/:id
#[instrument(skip(state, user))]
pub async fn delete_waste(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    user.require_staff()?;

    if !Waste::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Data gak ketemu"));
    }

    info!(waste_id = id, by = user.user_id, "report deleted");
    Ok(Json(json!({ "message": "Data berhasil dihapus!" })))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{
        async_trait,
        body::{to_bytes, Body},
        extract::FromRef,
        http::{
            header::{AUTHORIZATION, CONTENT_TYPE},
            Request, StatusCode,
        },
    };
    use bytes::Bytes;
    use tower::ServiceExt;

    use crate::auth::services::JwtKeys;
    use crate::state::AppState;
    use crate::storage::StorageClient;

    /// Storage double that counts writes, so tests can assert a rejected
    /// submission never reached storage.
    struct CountingStorage {
        puts: AtomicUsize,
    }

    #[async_trait]
    impl StorageClient for CountingStorage {
        async fn put_object(&self, _k: &str, _b: Bytes, _ct: &str) -> anyhow::Result<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn get_object(&self, _k: &str) -> anyhow::Result<Bytes> {
            Ok(Bytes::new())
        }
        async fn delete_object(&self, _k: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    const BOUNDARY: &str = "batas-laporan";

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn foto_part() -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"foto\"; filename=\"bukti.jpg\"\r\nContent-Type: image/jpeg\r\n\r\nisi-foto\r\n"
        )
    }

    async fn submit(state: AppState, role: &str, parts: Vec<String>) -> (StatusCode, serde_json::Value) {
        let token = JwtKeys::from_ref(&state).sign(1, role).expect("sign");
        let app = crate::app::build_app(state);

        let mut body = parts.concat();
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        let req = Request::builder()
            .method("POST")
            .uri("/api/waste")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("request");

        let resp = app.oneshot(req).await.expect("response");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn missing_photo_is_rejected_before_any_storage_write() {
        let storage = Arc::new(CountingStorage {
            puts: AtomicUsize::new(0),
        });
        let state = AppState::fake_with_storage(storage.clone());

        let (status, body) = submit(
            state,
            "user",
            vec![text_part("jenis", "organik"), text_part("berat", "2.5")],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Foto wajib diupload!" }));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_text_field_is_rejected_before_any_storage_write() {
        let storage = Arc::new(CountingStorage {
            puts: AtomicUsize::new(0),
        });
        let state = AppState::fake_with_storage(storage.clone());

        let (status, body) = submit(
            state,
            "user",
            vec![text_part("jenis", "organik"), foto_part()],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Input ga valid" }));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unparseable_weight_is_rejected_before_any_storage_write() {
        let storage = Arc::new(CountingStorage {
            puts: AtomicUsize::new(0),
        });
        let state = AppState::fake_with_storage(storage.clone());

        let (status, body) = submit(
            state,
            "user",
            vec![
                text_part("jenis", "organik"),
                text_part("berat", "berat-banget"),
                foto_part(),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Input ga valid" }));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_numeric_report_id_renders_the_error_envelope() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state).sign(1, "petugas").expect("sign");
        let app = crate::app::build_app(state);

        let req = Request::builder()
            .method("PUT")
            .uri("/api/waste/bukan-angka/status")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request");

        let resp = app.oneshot(req).await.expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body, serde_json::json!({ "error": "Input ga valid" }));
    }

    #[tokio::test]
    async fn plain_user_cannot_update_status() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state).sign(1, "user").expect("sign");
        let app = crate::app::build_app(state);

        let req = Request::builder()
            .method("PUT")
            .uri("/api/waste/1/status")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request");

        let resp = app.oneshot(req).await.expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
