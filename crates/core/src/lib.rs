//! Fieldwatch domain core.
//!
//! Pure domain logic shared by the persistence and API layers: canonical
//! types, the error taxonomy, device key material, detection payload
//! normalization, and aggregation shaping. This crate has no I/O and no
//! framework dependencies so it can be used from any future worker or CLI
//! tooling.

pub mod analysis;
pub mod detections;
pub mod device_keys;
pub mod error;
pub mod hashing;
pub mod roles;
pub mod types;
pub mod validate;
