//! Admin handlers for tenant accounts.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use fieldwatch_core::roles::ROLE_FARMER;
use fieldwatch_core::validate::{validate_role, validate_tenant_id, validate_username};
use fieldwatch_db::models::farmer::CreateFarmer;
use fieldwatch_db::repositories::FarmerRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::admin::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/admin/farmers
///
/// Create a tenant account. Duplicate usernames or tenant ids surface as
/// 409 Conflict via the unique constraints.
pub async fn create_farmer(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateFarmer>,
) -> AppResult<impl IntoResponse> {
    validate_username(&input.username)?;
    validate_tenant_id(&input.farmer_id)?;

    let role = input.role.as_deref().unwrap_or(ROLE_FARMER);
    validate_role(role)?;

    let credential_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let farmer = FarmerRepo::create(
        &state.pool,
        input.username.trim(),
        &credential_hash,
        &input.farmer_id,
        role,
    )
    .await?;

    tracing::info!(
        farmer_id = %farmer.farmer_id,
        username = %farmer.username,
        role = %farmer.role,
        "Tenant account created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: farmer })))
}

/// GET /api/admin/farmers
///
/// List tenant accounts. The credential hash is never serialized.
pub async fn list_farmers(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let farmers = FarmerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: farmers }))
}
