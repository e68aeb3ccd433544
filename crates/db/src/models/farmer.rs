//! Tenant account models and DTOs.

use fieldwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `farmers` table.
///
/// The credential hash is opaque to this system (Argon2id PHC string) and
/// never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Farmer {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub credential_hash: String,
    /// Tenant partition key referenced by devices and detection records.
    pub farmer_id: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for creating a tenant account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFarmer {
    pub username: String,
    pub password: String,
    pub farmer_id: String,
    /// Defaults to `"farmer"`.
    pub role: Option<String>,
}
