//! Shared helpers for router-level integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use depo_api::auth::jwt::JwtConfig;
use depo_api::config::ServerConfig;
use depo_api::rooms::NullRoomProvider;
use depo_api::router::build_app_router;
use depo_api::state::AppState;
use depo_core::admission::AdmissionPolicy;
use depo_core::memory::{MemoryStore, NullSink};
use depo_core::store::{EventSink, RoomProvider, SessionStore};
use depo_core::SessionOrchestrator;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        room_provider_url: None,
        jwt: JwtConfig {
            secret: "router-test-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers over an
/// in-memory engine.
///
/// The pool is created lazily against a closed port with a short
/// acquire timeout, so the stack can be exercised without a running
/// database; every deposition operation goes through the orchestrator's
/// in-memory store instead.
pub fn build_test_app() -> Router {
    let config = test_config();

    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(100))
        .connect_lazy("postgres://postgres@127.0.0.1:1/postgres")
        .expect("lazy pool creation should not fail");

    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
    let rooms: Arc<dyn RoomProvider> = Arc::new(NullRoomProvider);
    let sink: Arc<dyn EventSink> = Arc::new(NullSink);
    let orchestrator = Arc::new(SessionOrchestrator::new(
        store,
        rooms,
        sink,
        AdmissionPolicy::default(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        orchestrator,
    };

    build_app_router(state, &config)
}

/// Send a GET request through the router.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("router call")
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body must be valid JSON")
}
