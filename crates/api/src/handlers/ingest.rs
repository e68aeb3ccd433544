//! The ingestion pipeline: `POST /api/upload_result`.
//!
//! Authenticates the device, normalizes the detection payload, stores the
//! optional photo, and appends exactly one record. Every failure path
//! before the append leaves zero side effects (the blob write is the last
//! step before the insert, and a failed blob write drops the event whole).

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use fieldwatch_core::detections::{self, DetectionMap, RawDetections};
use fieldwatch_core::types::DbId;
use fieldwatch_db::models::detection::NewDetection;
use fieldwatch_db::repositories::DetectionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::device_auth::DeviceIdentity;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A detection submission. Three generations of capture client are in the
/// field, so all historical shapes are accepted:
///
/// - canonical: `{"detections": {"aphids": 3, "thrips": 2}}`
/// - fielded:   `{"raw_meta": {"aphids": "3"}}`
/// - legacy:    `{"insect": "aphids", "count": 3}`
///
/// Any client-supplied `farmer_id` is ignored; attribution comes from the
/// authenticated device.
#[derive(Debug, Deserialize)]
pub struct UploadResult {
    pub detections: Option<Map<String, Value>>,
    pub raw_meta: Option<Map<String, Value>>,
    pub insect: Option<String>,
    pub count: Option<Value>,
    pub image_base64: Option<String>,
}

/// Response for a persisted submission. `insect` and `count` are the
/// derived legacy fields older dashboards still read.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub record_id: DbId,
    pub farmer_id: String,
    pub device_id: DbId,
    pub detections: DetectionMap,
    pub insect: String,
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/upload_result
pub async fn upload_result(
    device: DeviceIdentity,
    State(state): State<AppState>,
    body: Result<Json<UploadResult>, JsonRejection>,
) -> AppResult<Json<IngestResponse>> {
    let Json(body) = body.map_err(|e| AppError::BadPayload(e.body_text()))?;

    let raw = raw_detections(&body)?;
    let canonical = detections::normalize(&raw);

    // The blob write happens before the record append so a storage failure
    // drops the event whole; counts are never saved without their photo.
    let image_url = match body.image_base64.as_deref().map(str::trim) {
        Some(encoded) if !encoded.is_empty() => {
            Some(store_image(&state, &device.farmer_id, encoded).await?)
        }
        _ => None,
    };

    let record = DetectionRepo::append(
        &state.pool,
        &NewDetection {
            recorded_at: Utc::now(),
            farmer_id: device.farmer_id.clone(),
            device_id: Some(device.device_id),
            detections: detections_json(&canonical),
            image_ref: image_url.clone(),
        },
    )
    .await?;

    tracing::info!(
        record_id = record.id,
        device_id = device.device_id,
        farmer_id = %device.farmer_id,
        labels = canonical.len(),
        total = detections::total(&canonical),
        has_image = image_url.is_some(),
        "Detection record ingested",
    );

    Ok(Json(IngestResponse {
        status: "ok",
        record_id: record.id,
        farmer_id: device.farmer_id,
        device_id: device.device_id,
        insect: detections::summary(&canonical),
        count: detections::total(&canonical),
        detections: canonical,
        image_url,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pick the payload shape. Precedence follows client generations: a body
/// carrying both `detections` and legacy fields is read as canonical.
fn raw_detections(body: &UploadResult) -> Result<RawDetections, AppError> {
    if let Some(map) = &body.detections {
        Ok(RawDetections::Map(map.clone()))
    } else if let Some(meta) = &body.raw_meta {
        Ok(RawDetections::Map(meta.clone()))
    } else if let Some(label) = &body.insect {
        Ok(RawDetections::Single {
            label: label.clone(),
            // A bare insect sighting with no count is one sighting.
            count: body.count.clone().unwrap_or_else(|| Value::from(1)),
        })
    } else {
        Err(AppError::BadPayload(
            "Body must contain 'detections', 'raw_meta', or 'insect'".into(),
        ))
    }
}

/// Decode, name, and persist the photo; returns its URL.
///
/// The blob write is bounded by `blob_timeout_secs` so a stalled upstream
/// store cannot pin request capacity.
async fn store_image(state: &AppState, farmer_id: &str, encoded: &str) -> AppResult<String> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| AppError::ImageDecode(e.to_string()))?;

    let extension = image::guess_format(&bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("jpg");

    let key = format!(
        "{}/{}_{}.{}",
        farmer_id,
        Utc::now().format("%Y%m%d%H%M%S"),
        Uuid::new_v4().simple(),
        extension,
    );

    tokio::time::timeout(
        Duration::from_secs(state.config.blob_timeout_secs),
        state.storage.put(&key, &bytes),
    )
    .await
    .map_err(|_| AppError::Storage("Blob store write timed out".into()))?
    .map_err(AppError::from)
}

/// Render the canonical map as the JSONB value stored on the record.
fn detections_json(canonical: &DetectionMap) -> Value {
    Value::Object(
        canonical
            .iter()
            .map(|(label, count)| (label.clone(), Value::from(*count)))
            .collect(),
    )
}
