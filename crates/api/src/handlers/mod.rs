//! Request handlers.
//!
//! Each submodule provides async handler functions for one area of the API.
//! Handlers delegate to the repositories in `fieldwatch_db` (and the blob
//! store in `fieldwatch_cloud`) and map errors via [`crate::error::AppError`].

pub mod analysis;
pub mod devices;
pub mod farmers;
pub mod images;
pub mod ingest;
pub mod records;
