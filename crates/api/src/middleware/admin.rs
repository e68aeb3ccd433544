//! Admin authorization extractor.
//!
//! The admin surface (device provisioning, key rotation, tenant accounts)
//! authenticates with a single bearer token from the environment. This is
//! the one authorization predicate for the whole admin boundary; handlers
//! contain no role checks of their own.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fieldwatch_core::error::CoreError;
use fieldwatch_core::hashing::sha256_hex;

use crate::error::AppError;
use crate::state::AppState;

/// Requires the configured admin bearer token. Rejects with 403 when the
/// token is wrong or the admin surface is not configured at all.
///
/// ```ignore
/// async fn admin_only(_admin: RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin_token.as_deref() else {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin API is not configured".into(),
            )));
        };

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        // Compare SHA-256 digests rather than the raw strings so the
        // comparison cost is independent of how much of the token matches.
        if sha256_hex(token.as_bytes()) != sha256_hex(expected.as_bytes()) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Invalid admin token".into(),
            )));
        }

        Ok(RequireAdmin)
    }
}
