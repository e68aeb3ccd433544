//! Device registry models and DTOs.

use fieldwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `devices` table.
///
/// **Note:** `key_hash` is never serialized to responses. The `key_prefix`
/// field is used for human-readable identification.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: DbId,
    pub name: String,
    #[serde(skip_serializing)]
    pub key_hash: String,
    pub key_prefix: String,
    pub farmer_id: String,
    pub last_used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for provisioning a new device.
///
/// Field names match the admin panel form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevice {
    pub device_name: String,
    pub farmer_id: String,
}

/// Response returned when a device is created or its key rotated.
/// Includes the plaintext key (shown exactly once).
#[derive(Debug, Clone, Serialize)]
pub struct DeviceCreatedResponse {
    pub id: DbId,
    pub name: String,
    pub farmer_id: String,
    pub key_prefix: String,
    /// The full plaintext bearer key. Shown **once** and never stored.
    pub device_key: String,
    pub created_at: Timestamp,
}
