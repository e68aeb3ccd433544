//! Aggregate queries over `detection_records`.
//!
//! The canonical detections map is stored as JSONB; per-insect aggregation
//! expands it with `jsonb_each_text` and groups by label. Stored values are
//! canonical positive integers, so the `::BIGINT` cast on `value` is safe.

use fieldwatch_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::detection::{DailyInsectCount, InsectTotal};

/// Read-only aggregation queries for dashboard views.
pub struct AnalysisRepo;

impl AnalysisRepo {
    /// Count records matching an optional tenant or device filter.
    pub async fn count_records(
        pool: &PgPool,
        farmer_id: Option<&str>,
        device_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM detection_records \
             WHERE ($1::TEXT IS NULL OR farmer_id = $1) \
               AND ($2::BIGINT IS NULL OR device_id = $2)",
        )
        .bind(farmer_id)
        .bind(device_id)
        .fetch_one(pool)
        .await
    }

    /// Sum each label's count across matching records.
    ///
    /// Labels whose total is zero are omitted; output is ordered by label
    /// for deterministic downstream iteration.
    pub async fn per_insect_totals(
        pool: &PgPool,
        farmer_id: Option<&str>,
        device_id: Option<DbId>,
    ) -> Result<Vec<InsectTotal>, sqlx::Error> {
        sqlx::query_as::<_, InsectTotal>(
            "SELECT d.key AS insect, SUM((d.value)::BIGINT)::BIGINT AS total \
             FROM detection_records r \
             CROSS JOIN LATERAL jsonb_each_text(r.detections) AS d(key, value) \
             WHERE ($1::TEXT IS NULL OR r.farmer_id = $1) \
               AND ($2::BIGINT IS NULL OR r.device_id = $2) \
             GROUP BY d.key \
             HAVING SUM((d.value)::BIGINT) > 0 \
             ORDER BY d.key",
        )
        .bind(farmer_id)
        .bind(device_id)
        .fetch_all(pool)
        .await
    }

    /// The single label with the highest total, ties broken by label order.
    pub async fn top_insect(
        pool: &PgPool,
        farmer_id: Option<&str>,
        device_id: Option<DbId>,
    ) -> Result<Option<InsectTotal>, sqlx::Error> {
        sqlx::query_as::<_, InsectTotal>(
            "SELECT d.key AS insect, SUM((d.value)::BIGINT)::BIGINT AS total \
             FROM detection_records r \
             CROSS JOIN LATERAL jsonb_each_text(r.detections) AS d(key, value) \
             WHERE ($1::TEXT IS NULL OR r.farmer_id = $1) \
               AND ($2::BIGINT IS NULL OR r.device_id = $2) \
             GROUP BY d.key \
             HAVING SUM((d.value)::BIGINT) > 0 \
             ORDER BY total DESC, insect ASC \
             LIMIT 1",
        )
        .bind(farmer_id)
        .bind(device_id)
        .fetch_optional(pool)
        .await
    }

    /// Per-day, per-label totals for one tenant since `since`.
    ///
    /// Days are calendar dates of the record's event time in UTC. Days with
    /// no records produce no rows here; the shaping layer zero-fills the
    /// axis.
    pub async fn daily_insect_counts(
        pool: &PgPool,
        farmer_id: &str,
        since: Timestamp,
    ) -> Result<Vec<DailyInsectCount>, sqlx::Error> {
        sqlx::query_as::<_, DailyInsectCount>(
            "SELECT (r.recorded_at AT TIME ZONE 'UTC')::DATE AS day, \
                    d.key AS insect, \
                    SUM((d.value)::BIGINT)::BIGINT AS total \
             FROM detection_records r \
             CROSS JOIN LATERAL jsonb_each_text(r.detections) AS d(key, value) \
             WHERE r.farmer_id = $1 AND r.recorded_at >= $2 \
             GROUP BY day, d.key \
             ORDER BY day, d.key",
        )
        .bind(farmer_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
