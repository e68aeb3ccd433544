//! Validation helpers for admin-facing inputs.
//!
//! Ingestion never validates strictly (bad telemetry degrades, see
//! [`crate::detections`]); these checks only guard administrative
//! operations where rejecting early is the right call.

use crate::error::CoreError;
use crate::roles::VALID_ROLES;

/// Maximum length of a device display name.
pub const MAX_DEVICE_NAME_LEN: usize = 120;

/// Maximum length of a tenant account username.
pub const MAX_USERNAME_LEN: usize = 64;

/// Maximum length of a tenant partition key.
pub const MAX_TENANT_ID_LEN: usize = 64;

/// Validate a device display name: non-empty and within length limit.
pub fn validate_device_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Device name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_DEVICE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Device name too long: {} chars (max {MAX_DEVICE_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate an account username: non-empty and within length limit.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.trim().is_empty() {
        return Err(CoreError::Validation(
            "Username must not be empty".to_string(),
        ));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(CoreError::Validation(format!(
            "Username too long: {} chars (max {MAX_USERNAME_LEN})",
            username.len()
        )));
    }
    Ok(())
}

/// Validate a tenant partition key (e.g. `farmer_001`): non-empty, within
/// length limit, and restricted to characters safe in blob key prefixes.
pub fn validate_tenant_id(tenant_id: &str) -> Result<(), CoreError> {
    if tenant_id.is_empty() {
        return Err(CoreError::Validation(
            "farmer_id must not be empty".to_string(),
        ));
    }
    if tenant_id.len() > MAX_TENANT_ID_LEN {
        return Err(CoreError::Validation(format!(
            "farmer_id too long: {} chars (max {MAX_TENANT_ID_LEN})",
            tenant_id.len()
        )));
    }
    if !tenant_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CoreError::Validation(
            "farmer_id may only contain letters, digits, '_' and '-'".to_string(),
        ));
    }
    Ok(())
}

/// Validate that `role` is one of the allowed values.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}
