use std::path::PathBuf;

/// Which blob storage backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Local filesystem, served back at `/uploads`.
    Local,
    /// S3 or any S3-compatible object store.
    S3,
}

/// Blob storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base directory for the local backend (default: `uploads`).
    pub local_dir: PathBuf,
    /// URL prefix dashboards fetch stored images from. Defaults to
    /// `/uploads` for the local backend and the bucket endpoint for S3.
    pub public_base_url: Option<String>,
    /// Bucket name; required when `backend` is [`StorageBackend::S3`].
    pub s3_bucket: Option<String>,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on a single blob store write during ingestion; a stalled
    /// upstream store must not pin request capacity (default: `30`).
    pub blob_timeout_secs: u64,
    /// Bearer token for the admin surface. When unset, admin endpoints are
    /// disabled and respond 403.
    pub admin_token: Option<String>,
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `BLOB_TIMEOUT_SECS`    | `30`                       |
    /// | `ADMIN_API_TOKEN`      | unset (admin disabled)     |
    /// | `STORAGE_BACKEND`      | `local`                    |
    /// | `UPLOAD_DIR`           | `uploads`                  |
    /// | `STORAGE_PUBLIC_URL`   | unset (backend default)    |
    /// | `S3_BUCKET`            | unset                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let blob_timeout_secs: u64 = std::env::var("BLOB_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("BLOB_TIMEOUT_SECS must be a valid u64");

        let admin_token = std::env::var("ADMIN_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .to_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            "s3" => StorageBackend::S3,
            other => panic!("Unknown STORAGE_BACKEND '{other}'. Must be 'local' or 's3'"),
        };

        let storage = StorageConfig {
            backend,
            local_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            public_base_url: std::env::var("STORAGE_PUBLIC_URL").ok(),
            s3_bucket: std::env::var("S3_BUCKET").ok(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            blob_timeout_secs,
            admin_token,
            storage,
        }
    }
}
