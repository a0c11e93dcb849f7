use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bounceban_bridge_core::{router, AppState, ConfigBuilder, Verifier};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";

/// A router wired to `server`, with a fast poll loop.
pub fn app_for(server: &MockServer, fallback_key: Option<&str>) -> Router {
    app_with_shutdown(server, fallback_key, CancellationToken::new())
}

pub fn app_with_shutdown(
    server: &MockServer,
    fallback_key: Option<&str>,
    shutdown: CancellationToken,
) -> Router {
    let mut builder = ConfigBuilder::new()
        .api_base_url(format!("{}/v1", server.uri()))
        .lookup_timeout(Duration::from_secs(2))
        .bulk_timeout(Duration::from_secs(2))
        .poll_interval(Duration::from_millis(20))
        .poll_deadline(Duration::from_millis(120));
    if let Some(key) = fallback_key {
        builder = builder.fallback_api_key(key);
    }
    let config = builder.build().unwrap();
    let verifier = Verifier::from_config(&config).unwrap();
    router(Arc::new(AppState::new(verifier, shutdown)))
}

/// POSTs `body` to `uri` and returns the decoded envelope.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
