//! Repository for the append-only `detection_records` table.

use fieldwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::detection::{DetectionRecord, NewDetection};

const RECORD_COLUMNS: &str =
    "id, recorded_at, farmer_id, device_id, detections, image_ref, created_at";

/// Append and query operations for detection records.
///
/// There is deliberately no update or delete: the table is an append-only
/// log and rows are immutable once written.
pub struct DetectionRepo;

impl DetectionRepo {
    /// Append one detection record, returning the stored row.
    pub async fn append(
        pool: &PgPool,
        new: &NewDetection,
    ) -> Result<DetectionRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO detection_records \
                (recorded_at, farmer_id, device_id, detections, image_ref) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {RECORD_COLUMNS}"
        );
        sqlx::query_as::<_, DetectionRecord>(&query)
            .bind(new.recorded_at)
            .bind(&new.farmer_id)
            .bind(new.device_id)
            .bind(&new.detections)
            .bind(new.image_ref.as_deref())
            .fetch_one(pool)
            .await
    }

    /// List records newest first, optionally filtered by tenant or device.
    pub async fn list(
        pool: &PgPool,
        farmer_id: Option<&str>,
        device_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DetectionRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM detection_records \
             WHERE ($1::TEXT IS NULL OR farmer_id = $1) \
               AND ($2::BIGINT IS NULL OR device_id = $2) \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, DetectionRecord>(&query)
            .bind(farmer_id)
            .bind(device_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a single record by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DetectionRecord>, sqlx::Error> {
        let query = format!("SELECT {RECORD_COLUMNS} FROM detection_records WHERE id = $1");
        sqlx::query_as::<_, DetectionRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
