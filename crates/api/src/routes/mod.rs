pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /upload_result                    device ingestion (Device-Key header)
///
/// /summary                          totals + per-insect + top insect
/// /analysis_data                    daily per-insect time series
/// /records                          newest-first record listing
/// /images                           stored image listing
///
/// /admin/devices                    list, create (admin token)
/// /admin/devices/{id}               get
/// /admin/devices/{id}/rotate        rotate key (POST)
/// /admin/farmers                    list, create (admin token)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Device-facing ingestion.
        .route("/upload_result", post(handlers::ingest::upload_result))
        // Dashboard-facing reads.
        .route("/summary", get(handlers::analysis::summary))
        .route("/analysis_data", get(handlers::analysis::analysis_data))
        .route("/records", get(handlers::records::list_records))
        .route("/images", get(handlers::images::list_images))
        // Admin surface.
        .nest("/admin/devices", devices_router())
        .nest("/admin/farmers", farmers_router())
}

/// Admin device registry routes mounted at `/admin/devices`.
fn devices_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::devices::list_devices).post(handlers::devices::create_device),
        )
        .route("/{id}", get(handlers::devices::get_device))
        .route("/{id}/rotate", post(handlers::devices::rotate_key))
}

/// Admin tenant account routes mounted at `/admin/farmers`.
fn farmers_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::farmers::list_farmers).post(handlers::farmers::create_farmer),
    )
}
