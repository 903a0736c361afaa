use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_DONE: &str = "selesai";

/// Waste report record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Waste {
    pub id: i64,
    pub user_id: i64,
    pub jenis: String,
    pub berat: f64,
    pub foto_url: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Listing row: report joined with its owner's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct WasteWithOwner {
    pub id: i64,
    pub user_id: i64,
    pub jenis: String,
    pub berat: f64,
    pub foto_url: String,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub owner_email: String,
    pub owner_role: String,
}

impl Waste {
    /// Persist a new report. Status defaults to `pending`; `foto_url` must
    /// already point at a stored object.
    pub async fn create(
        db: &PgPool,
        user_id: i64,
        jenis: &str,
        berat: f64,
        foto_url: &str,
    ) -> Result<Waste, sqlx::Error> {
        sqlx::query_as::<_, Waste>(
            r#"
            INSERT INTO wastes (user_id, jenis, berat, foto_url, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, jenis, berat, foto_url, status, created_at
            "#,
        )
        .bind(user_id)
        .bind(jenis)
        .bind(berat)
        .bind(foto_url)
        .bind(STATUS_PENDING)
        .fetch_one(db)
        .await
    }

    /// All reports, newest first, each with its owner joined in.
    pub async fn list_with_owner(db: &PgPool) -> Result<Vec<WasteWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, WasteWithOwner>(
            r#"
            SELECT w.id, w.user_id, w.jenis, w.berat, w.foto_url, w.status, w.created_at,
                   u.email AS owner_email, u.role AS owner_role
            FROM wastes w
            JOIN users u ON u.id = w.user_id
            ORDER BY w.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Set a report's status to done. Unconditional, so re-applying is a
    /// no-op; `None` means the id does not exist.
    pub async fn set_done(db: &PgPool, id: i64) -> Result<Option<Waste>, sqlx::Error> {
        sqlx::query_as::<_, Waste>(
            r#"
            UPDATE wastes
            SET status = $2
            WHERE id = $1
            RETURNING id, user_id, jenis, berat, foto_url, status, created_at
            "#,
        )
        .bind(id)
        .bind(STATUS_DONE)
        .fetch_optional(db)
        .await
    }

    /// Delete a report row. Returns whether anything was removed. The stored
    /// photo object is left behind (see DESIGN.md).
    pub async fn delete(db: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wastes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn waste_serializes_all_public_fields() {
        let waste = Waste {
            id: 3,
            user_id: 1,
            jenis: "organik".into(),
            berat: 2.5,
            foto_url: "http://localhost:9000/waste-photos/abc.jpg".into(),
            status: STATUS_PENDING.into(),
            created_at: datetime!(2024-06-01 08:00:00 UTC),
        };
        let json = serde_json::to_string(&waste).unwrap();
        assert!(json.contains("\"jenis\":\"organik\""));
        assert!(json.contains("\"status\":\"pending\""));
        assert!(json.contains("waste-photos/abc.jpg"));
    }
}
