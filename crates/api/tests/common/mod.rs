use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use fieldwatch_api::config::{ServerConfig, StorageBackend, StorageConfig};
use fieldwatch_api::routes;
use fieldwatch_api::state::AppState;
use fieldwatch_cloud::LocalStorage;

/// Admin bearer token used by the test configuration.
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Build a test `ServerConfig` with safe defaults and local blob storage
/// rooted at `upload_dir`.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        blob_timeout_secs: 5,
        admin_token: Some(ADMIN_TOKEN.to_string()),
        storage: StorageConfig {
            backend: StorageBackend::Local,
            local_dir: upload_dir.to_path_buf(),
            public_base_url: Some("/uploads".to_string()),
            s3_bucket: None,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a temporary local blob store.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. The returned `TempDir` owns the
/// blob directory; keep it alive for the duration of the test.
pub fn build_test_app(pool: PgPool) -> (Router, TempDir) {
    let upload_dir = tempfile::tempdir().expect("Failed to create temp upload dir");
    let config = test_config(upload_dir.path());
    let storage = Arc::new(LocalStorage::new(upload_dir.path(), "/uploads"));

    let state = AppState {
        pool,
        config: Arc::new(config),
        storage,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .nest_service("/uploads", ServeDir::new(upload_dir.path()))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    (router, upload_dir)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Build a JSON request with optional extra headers.
pub fn json_request(
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Issue a POST request with a JSON body and optional extra headers.
pub async fn post_json(
    app: Router,
    uri: &str,
    headers: &[(&str, &str)],
    body: &serde_json::Value,
) -> Response {
    app.oneshot(json_request(Method::POST, uri, headers, body))
        .await
        .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Authorization` header pair for admin requests.
pub fn admin_auth() -> (&'static str, String) {
    ("authorization", format!("Bearer {ADMIN_TOKEN}"))
}

/// Provision a device through the admin API; returns `(device_id, plaintext_key)`.
pub async fn create_device(app: &Router, name: &str, farmer_id: &str) -> (i64, String) {
    let (header, value) = admin_auth();
    let response = post_json(
        app.clone(),
        "/api/admin/devices",
        &[(header, value.as_str())],
        &serde_json::json!({"device_name": name, "farmer_id": farmer_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "device creation failed");

    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().expect("device id");
    let key = json["data"]["device_key"]
        .as_str()
        .expect("plaintext device key")
        .to_string();
    (id, key)
}
