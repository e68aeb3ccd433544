//! Repository for the `farmers` table.

use sqlx::PgPool;

use crate::models::farmer::Farmer;

const FARMER_COLUMNS: &str = "id, username, credential_hash, farmer_id, role, created_at";

/// Provides CRUD operations for tenant accounts.
pub struct FarmerRepo;

impl FarmerRepo {
    /// Create a tenant account.
    ///
    /// Duplicate `username` or `farmer_id` raises the `uq_farmers_*` unique
    /// constraints, which the API layer maps to 409 Conflict.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        credential_hash: &str,
        farmer_id: &str,
        role: &str,
    ) -> Result<Farmer, sqlx::Error> {
        let query = format!(
            "INSERT INTO farmers (username, credential_hash, farmer_id, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {FARMER_COLUMNS}"
        );
        sqlx::query_as::<_, Farmer>(&query)
            .bind(username)
            .bind(credential_hash)
            .bind(farmer_id)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Find an account by its unique username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Farmer>, sqlx::Error> {
        let query = format!("SELECT {FARMER_COLUMNS} FROM farmers WHERE username = $1");
        sqlx::query_as::<_, Farmer>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by its tenant partition key.
    pub async fn find_by_tenant(
        pool: &PgPool,
        farmer_id: &str,
    ) -> Result<Option<Farmer>, sqlx::Error> {
        let query = format!("SELECT {FARMER_COLUMNS} FROM farmers WHERE farmer_id = $1");
        sqlx::query_as::<_, Farmer>(&query)
            .bind(farmer_id)
            .fetch_optional(pool)
            .await
    }

    /// List all tenant accounts ordered by username.
    pub async fn list(pool: &PgPool) -> Result<Vec<Farmer>, sqlx::Error> {
        let query = format!("SELECT {FARMER_COLUMNS} FROM farmers ORDER BY username");
        sqlx::query_as::<_, Farmer>(&query).fetch_all(pool).await
    }
}
