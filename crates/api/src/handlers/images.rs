//! Stored image listing for the dashboard gallery.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for image listing. Pass a tenant prefix such as
/// `farmer_001/` to scope the gallery.
#[derive(Debug, Deserialize)]
pub struct ListImagesParams {
    pub prefix: Option<String>,
}

/// GET /api/images
pub async fn list_images(
    State(state): State<AppState>,
    Query(params): Query<ListImagesParams>,
) -> AppResult<impl IntoResponse> {
    let objects = state
        .storage
        .list(params.prefix.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(DataResponse { data: objects }))
}
