use bytes::Bytes;
use serde::Serialize;
use time::OffsetDateTime;

use crate::auth::dto::PublicUser;
use crate::waste::repo::WasteWithOwner;

/// Text fields of a report submission, parsed out of the multipart body.
#[derive(Debug)]
pub struct NewReport {
    pub jenis: String,
    pub berat: f64,
}

/// The photo attachment of a report submission.
pub struct PhotoUpload {
    pub bytes: Bytes,
    pub content_type: String,
    pub filename: String,
}

/// Listing entry: the report plus its owner's public fields.
#[derive(Debug, Serialize)]
pub struct WasteListItem {
    pub id: i64,
    pub jenis: String,
    pub berat: f64,
    pub foto_url: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user: PublicUser,
}

impl From<WasteWithOwner> for WasteListItem {
    fn from(row: WasteWithOwner) -> Self {
        Self {
            id: row.id,
            jenis: row.jenis,
            berat: row.berat,
            foto_url: row.foto_url,
            status: row.status,
            created_at: row.created_at,
            user: PublicUser {
                id: row.user_id,
                email: row.owner_email,
                role: row.owner_role,
            },
        }
    }
}
