//! Record listing for the dashboard's dataset view.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use fieldwatch_core::detections::{self, DetectionMap};
use fieldwatch_core::types::{DbId, Timestamp};
use fieldwatch_db::models::detection::DetectionRecord;
use fieldwatch_db::repositories::{clamp_limit, clamp_offset, DetectionRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for record listing.
#[derive(Debug, Deserialize)]
pub struct ListRecordsParams {
    pub farmer_id: Option<String>,
    pub device_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A record as served to dashboards: the canonical map plus the derived
/// legacy `insect`/`count` fields, computed at read time.
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub id: DbId,
    pub recorded_at: Timestamp,
    pub farmer_id: String,
    pub device_id: Option<DbId>,
    pub detections: DetectionMap,
    pub insect: String,
    pub count: i64,
    pub image_url: Option<String>,
}

impl From<DetectionRecord> for RecordView {
    fn from(record: DetectionRecord) -> Self {
        let map = record.detection_map();
        Self {
            id: record.id,
            recorded_at: record.recorded_at,
            farmer_id: record.farmer_id,
            device_id: record.device_id,
            insect: detections::summary(&map),
            count: detections::total(&map),
            detections: map,
            image_url: record.image_ref,
        }
    }
}

/// GET /api/records
///
/// Newest-first page of detection records, optionally filtered by tenant
/// or device.
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<ListRecordsParams>,
) -> AppResult<impl IntoResponse> {
    let records = DetectionRepo::list(
        &state.pool,
        params.farmer_id.as_deref(),
        params.device_id,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;

    let views: Vec<RecordView> = records.into_iter().map(RecordView::from).collect();
    Ok(Json(DataResponse { data: views }))
}
