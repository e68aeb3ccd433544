use std::sync::Arc;

use fieldwatch_cloud::StorageProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Constructed once in `main` and injected everywhere; no component reaches
/// for ambient globals. Cheaply cloneable (inner data is behind `Arc` or is
/// already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fieldwatch_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Blob store for detection photos.
    pub storage: Arc<dyn StorageProvider>,
}
