//! Admin handlers for the device registry.
//!
//! All endpoints require the admin bearer token via [`RequireAdmin`].
//! The plaintext key is returned **only** on creation and rotation;
//! subsequent queries expose only the `key_prefix` for identification.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use fieldwatch_core::device_keys::generate_device_key;
use fieldwatch_core::error::CoreError;
use fieldwatch_core::types::DbId;
use fieldwatch_core::validate::{validate_device_name, validate_tenant_id};
use fieldwatch_db::models::device::{CreateDevice, DeviceCreatedResponse};
use fieldwatch_db::repositories::DeviceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::admin::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for device listing.
#[derive(Debug, Deserialize)]
pub struct ListDevicesParams {
    pub farmer_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/devices
///
/// Provision a new device. The plaintext key is returned exactly once.
pub async fn create_device(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDevice>,
) -> AppResult<impl IntoResponse> {
    validate_device_name(&input.device_name)?;
    validate_tenant_id(&input.farmer_id)?;

    let generated = generate_device_key();

    let device = DeviceRepo::create(
        &state.pool,
        input.device_name.trim(),
        &input.farmer_id,
        &generated.hash,
        &generated.prefix,
    )
    .await?;

    tracing::info!(
        device_id = device.id,
        key_prefix = %generated.prefix,
        farmer_id = %device.farmer_id,
        "Device created",
    );

    let response = DeviceCreatedResponse {
        id: device.id,
        name: device.name,
        farmer_id: device.farmer_id,
        key_prefix: generated.prefix,
        device_key: generated.plaintext,
        created_at: device.created_at,
    };

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/admin/devices
///
/// List devices, optionally scoped to one tenant. Shows prefix only,
/// never the full key.
pub async fn list_devices(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListDevicesParams>,
) -> AppResult<impl IntoResponse> {
    let devices = match params.farmer_id.as_deref() {
        Some(farmer_id) => DeviceRepo::list_by_farmer(&state.pool, farmer_id).await?,
        None => DeviceRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: devices }))
}

/// GET /api/admin/devices/{id}
pub async fn get_device(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(device_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let device = DeviceRepo::find_by_id(&state.pool, device_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Device",
            id: device_id,
        }))?;
    Ok(Json(DataResponse { data: device }))
}

/// POST /api/admin/devices/{id}/rotate
///
/// Rotate a device key: generate a new key, replace hash and prefix in one
/// statement. The old key is rejected from the moment this returns.
/// Returns the new plaintext key (shown once).
pub async fn rotate_key(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(device_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let existing = DeviceRepo::find_by_id(&state.pool, device_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Device",
            id: device_id,
        }))?;

    let generated = generate_device_key();

    let rotated = DeviceRepo::rotate(&state.pool, device_id, &generated.hash, &generated.prefix)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Device",
            id: device_id,
        }))?;

    tracing::info!(
        device_id,
        old_prefix = %existing.key_prefix,
        new_prefix = %generated.prefix,
        "Device key rotated",
    );

    let response = DeviceCreatedResponse {
        id: rotated.id,
        name: rotated.name,
        farmer_id: rotated.farmer_id,
        key_prefix: generated.prefix,
        device_key: generated.plaintext,
        created_at: rotated.created_at,
    };

    Ok(Json(DataResponse { data: response }))
}
