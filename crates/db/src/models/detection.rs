//! Detection record models and aggregate row types.

use fieldwatch_core::detections::DetectionMap;
use fieldwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `detection_records` table.
///
/// `detections` holds the canonical label-to-count map as JSONB; it is
/// written once by the ingestion pipeline and never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DetectionRecord {
    pub id: DbId,
    /// Event time (equal to ingestion time for device submissions).
    pub recorded_at: Timestamp,
    pub farmer_id: String,
    /// Absent for manual/admin-linked uploads.
    pub device_id: Option<DbId>,
    pub detections: serde_json::Value,
    /// Blob store reference for the photo, when one was uploaded.
    pub image_ref: Option<String>,
    pub created_at: Timestamp,
}

impl DetectionRecord {
    /// Decode the stored JSONB into the canonical detections map.
    ///
    /// Stored values are already canonical positive integers; anything that
    /// is not (a hand-edited row, say) degrades the same way ingestion
    /// normalization does rather than failing the read.
    pub fn detection_map(&self) -> DetectionMap {
        let mut map = DetectionMap::new();
        if let Some(object) = self.detections.as_object() {
            for (label, value) in object {
                let count = value.as_i64().unwrap_or(0);
                if count > 0 {
                    map.insert(label.clone(), count);
                }
            }
        }
        map
    }
}

/// Insert payload for a new detection record.
#[derive(Debug, Clone)]
pub struct NewDetection {
    pub recorded_at: Timestamp,
    pub farmer_id: String,
    pub device_id: Option<DbId>,
    pub detections: serde_json::Value,
    pub image_ref: Option<String>,
}

/// Aggregate row: one label's summed count across matching records.
#[derive(Debug, Clone, FromRow)]
pub struct InsectTotal {
    pub insect: String,
    pub total: i64,
}

/// Aggregate row: one label's summed count on one calendar day.
#[derive(Debug, Clone, FromRow)]
pub struct DailyInsectCount {
    pub day: chrono::NaiveDate,
    pub insect: String,
    pub total: i64,
}
