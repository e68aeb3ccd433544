//! Authentication and authorization extractors.
//!
//! - [`device_auth::DeviceIdentity`] -- Resolves the `Device-Key` header to
//!   an authenticated device.
//! - [`admin::RequireAdmin`] -- Requires the configured admin bearer token.

pub mod admin;
pub mod device_auth;
