//! Well-known role name constants.
//!
//! These must match the `role` CHECK constraint on the `farmers` table.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_FARMER: &str = "farmer";

/// All roles accepted at account creation.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_FARMER];
