//! Shared response envelope types for API handlers.
//!
//! Admin and listing endpoints use a `{ "data": ... }` envelope. The
//! device ingestion and dashboard aggregate endpoints return their
//! structures bare because those wire contracts predate this server and
//! are fixed by deployed consumers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// Wraps any serializable payload in the project's standard response format.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
