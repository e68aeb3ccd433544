//! Repository for the `devices` table.

use fieldwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::device::Device;

const DEVICE_COLUMNS: &str = "id, name, key_hash, key_prefix, farmer_id, last_used_at, created_at";

/// Provides CRUD operations for the device registry.
pub struct DeviceRepo;

impl DeviceRepo {
    /// Create a new device. Returns the full row (with hash).
    ///
    /// The caller generates the key material and passes only the hash and
    /// display prefix; the plaintext never reaches this layer.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        farmer_id: &str,
        key_hash: &str,
        key_prefix: &str,
    ) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices (name, key_hash, key_prefix, farmer_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(name)
            .bind(key_hash)
            .bind(key_prefix)
            .bind(farmer_id)
            .fetch_one(pool)
            .await
    }

    /// Find a device by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a device by the SHA-256 hash of its bearer key.
    ///
    /// Used during ingestion authentication; the lookup rides the unique
    /// index on `key_hash`.
    pub async fn find_by_hash(
        pool: &PgPool,
        key_hash: &str,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE key_hash = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(key_hash)
            .fetch_optional(pool)
            .await
    }

    /// List all devices, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Device>(&query).fetch_all(pool).await
    }

    /// List a single tenant's devices, newest first.
    pub async fn list_by_farmer(
        pool: &PgPool,
        farmer_id: &str,
    ) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!(
            "SELECT {DEVICE_COLUMNS} FROM devices \
             WHERE farmer_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(farmer_id)
            .fetch_all(pool)
            .await
    }

    /// Rotate a device key: replace hash and prefix in one statement.
    ///
    /// The single UPDATE makes rotation atomic with respect to concurrent
    /// `find_by_hash` lookups; the old hash is unresolvable the moment this
    /// returns.
    pub async fn rotate(
        pool: &PgPool,
        id: DbId,
        new_hash: &str,
        new_prefix: &str,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!(
            "UPDATE devices SET key_hash = $2, key_prefix = $3 \
             WHERE id = $1 \
             RETURNING {DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .bind(new_hash)
            .bind(new_prefix)
            .fetch_optional(pool)
            .await
    }

    /// Update `last_used_at` to the current timestamp.
    pub async fn touch_last_used(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE devices SET last_used_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
