use tracing::{error, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::notify::ReportNotice;
use crate::state::AppState;
use crate::storage::public_object_url;
use crate::waste::dto::{NewReport, PhotoUpload};
use crate::waste::repo::Waste;

/// Collision-resistant object name: random UUID plus the upload's original
/// extension.
pub fn object_key(filename: &str) -> String {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{}{}", Uuid::new_v4(), ext)
}

/// Summary pushed to the staff WhatsApp number for every new report.
pub fn report_message(waste: &Waste) -> String {
    format!(
        "📢 *Laporan Baru Masuk!*\n\nJenis: {}\nBerat: {:.2} Kg\nOleh User ID: {}",
        waste.jenis, waste.berat, waste.user_id
    )
}

/// Report ingestion pipeline: store the photo, persist the row, enqueue the
/// notification. The photo write must succeed before anything is persisted;
/// a failed insert deletes the just-uploaded object again.
pub async fn create_report(
    state: &AppState,
    user_id: i64,
    input: NewReport,
    photo: PhotoUpload,
) -> Result<Waste, ApiError> {
    let key = object_key(&photo.filename);

    state
        .storage
        .put_object(&key, photo.bytes, &photo.content_type)
        .await
        .map_err(|e| {
            error!(error = %e, key, "photo upload failed");
            ApiError::StorageUnavailable
        })?;

    let foto_url = public_object_url(
        &state.config.minio.public_url,
        &state.config.minio.bucket,
        &key,
    );

    let waste = match Waste::create(&state.db, user_id, &input.jenis, input.berat, &foto_url).await
    {
        Ok(w) => w,
        Err(e) => {
            if let Err(de) = state.storage.delete_object(&key).await {
                warn!(error = %de, key, "orphan photo cleanup failed");
            }
            return Err(e.into());
        }
    };

    // Fire-and-forget: the response does not wait for delivery.
    state.notifier.enqueue(ReportNotice {
        destination: state.config.wa.destination.clone(),
        message: report_message(&waste),
        object_key: Some(key),
    });

    Ok(waste)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waste::repo::STATUS_PENDING;
    use time::macros::datetime;

    #[test]
    fn object_key_keeps_extension() {
        let key = object_key("bukti-sampah.jpg");
        assert!(key.ends_with(".jpg"));
        assert_eq!(key.len(), 36 + 4);
    }

    #[test]
    fn object_key_without_extension_is_bare_uuid() {
        let key = object_key("fotosampah");
        assert_eq!(key.len(), 36);
    }

    #[test]
    fn object_keys_do_not_collide() {
        assert_ne!(object_key("a.png"), object_key("a.png"));
    }

    #[test]
    fn report_message_carries_summary_fields() {
        let waste = Waste {
            id: 1,
            user_id: 7,
            jenis: "organik".into(),
            berat: 2.5,
            foto_url: "http://x/y/z.jpg".into(),
            status: STATUS_PENDING.into(),
            created_at: datetime!(2024-06-01 08:00:00 UTC),
        };
        let msg = report_message(&waste);
        assert!(msg.contains("Jenis: organik"));
        assert!(msg.contains("Berat: 2.50 Kg"));
        assert!(msg.contains("User ID: 7"));
    }
}
