//! Dashboard aggregation endpoints.
//!
//! These return the aggregate structures bare (no `data` envelope): the
//! dashboard consumers are external and the shapes are part of the public
//! contract. An empty record set is a valid zero-valued result, never an
//! error.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Days, NaiveTime, Utc};
use serde::Deserialize;

use fieldwatch_core::analysis::{self, Summary, TimeSeries};
use fieldwatch_core::types::DbId;
use fieldwatch_db::repositories::AnalysisRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `/api/summary`: at most one of the two filters.
#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub farmer_id: Option<String>,
    pub device_id: Option<DbId>,
}

/// Query parameters for `/api/analysis_data`.
#[derive(Debug, Deserialize)]
pub struct AnalysisDataParams {
    pub farmer_id: String,
    pub days: Option<u32>,
}

/// GET /api/summary
///
/// Totals, per-insect breakdown, and top insect over all records, one
/// tenant, or one device.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> AppResult<Json<Summary>> {
    if params.farmer_id.is_some() && params.device_id.is_some() {
        return Err(AppError::BadPayload(
            "farmer_id and device_id are mutually exclusive".into(),
        ));
    }

    let farmer_id = params.farmer_id.as_deref();
    let total_records = AnalysisRepo::count_records(&state.pool, farmer_id, params.device_id).await?;
    let totals = AnalysisRepo::per_insect_totals(&state.pool, farmer_id, params.device_id).await?;

    let totals: Vec<(String, i64)> = totals
        .into_iter()
        .map(|row| (row.insect, row.total))
        .collect();

    Ok(Json(analysis::summarize(total_records, &totals)))
}

/// GET /api/analysis_data
///
/// Daily per-insect counts for one tenant over a trailing window, on a
/// dense date axis ending today (UTC).
pub async fn analysis_data(
    State(state): State<AppState>,
    Query(params): Query<AnalysisDataParams>,
) -> AppResult<Json<TimeSeries>> {
    let days = analysis::clamp_window_days(params.days);
    let today = Utc::now().date_naive();
    let start = today - Days::new(u64::from(days - 1));
    let since = start.and_time(NaiveTime::MIN).and_utc();

    let rows = AnalysisRepo::daily_insect_counts(&state.pool, &params.farmer_id, since).await?;
    let rows: Vec<_> = rows
        .into_iter()
        .map(|row| (row.day, row.insect, row.total))
        .collect();

    Ok(Json(analysis::build_time_series(today, days, &rows)))
}
