use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::routing::get;
use axum::{middleware, Json, Router};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::middleware::{fallback, handle_panic, handle_timeout, log_requests};
use crate::state::AppState;
use crate::{metrics, openapi};

pub mod crud;
pub mod customers;
pub mod products;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
///
/// `/api/*` routes get panic capture, the optional request timeout and the
/// request logging middleware; `/health`, `/metrics` and the OpenAPI
/// document are served bare.
pub fn build_router(state: AppState, cors: CorsLayer, request_timeout: Option<Duration>) -> Router {
    let api = guard_api(
        Router::new().merge(products::router()).merge(customers::router()),
        request_timeout,
    );

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .merge(api)
        .fallback(fallback)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

/// Layers shared by every `/api/*` route, innermost first: panic backstop,
/// optional timeout (408), request logging.
fn guard_api<S>(api: Router<S>, request_timeout: Option<Duration>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let mut api = api.layer(CatchPanicLayer::custom(handle_panic));

    if let Some(limit) = request_timeout {
        api = api.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(limit),
        );
    }

    api.layer(middleware::from_fn(log_requests))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn slow_report() -> &'static str {
        tokio::time::sleep(Duration::from_millis(200)).await;
        "late"
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn slow_api_requests_answer_408() {
        let app = guard_api(
            Router::new().route("/api/slow", get(slow_report)),
            Some(Duration::from_millis(1)),
        );
        let (status, body) = call(app, "/api/slow").await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Request timeout");
        assert_eq!(body["errors"], serde_json::json!(["The request did not complete in time"]));
    }

    #[tokio::test]
    async fn no_limit_lets_slow_requests_finish() {
        let app = guard_api(Router::new().route("/api/slow", get(slow_report)), None);
        let (status, _) = call(app, "/api/slow").await;
        assert_eq!(status, StatusCode::OK);
    }
}
