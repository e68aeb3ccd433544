//! Device authentication extractor for the ingestion endpoint.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fieldwatch_core::device_keys::hash_device_key;
use fieldwatch_core::types::DbId;
use fieldwatch_db::repositories::DeviceRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the device's bearer key, as sent by the deployed
/// capture clients.
pub const DEVICE_KEY_HEADER: &str = "device-key";

/// Authenticated device identity resolved from the `Device-Key` header.
///
/// The resolved `farmer_id` and `device_id` are authoritative for the
/// request: a device can only ever write data attributed to itself, so any
/// client-supplied tenant identifiers are ignored by handlers using this
/// extractor.
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub device_id: DbId,
    pub farmer_id: String,
}

impl FromRequestParts<AppState> for DeviceIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(DEVICE_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AppError::AuthMissing)?;

        // The presented key is hashed and resolved over the unique index on
        // `key_hash`; no raw secret comparison happens anywhere.
        let device = DeviceRepo::find_by_hash(&state.pool, &hash_device_key(key))
            .await?
            .ok_or(AppError::AuthInvalid)?;

        // Best-effort usage stamp; a failure here must not fail ingestion.
        if let Err(error) = DeviceRepo::touch_last_used(&state.pool, device.id).await {
            tracing::warn!(device_id = device.id, %error, "Failed to update last_used_at");
        }

        Ok(DeviceIdentity {
            device_id: device.id,
            farmer_id: device.farmer_id,
        })
    }
}
