use std::any::Any;
use std::borrow::Cow;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::{CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Json};
use common::types::ApiResponse;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::Fault;
use crate::metrics;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest body excerpt written to the log, in characters.
pub const MAX_LOGGED_BODY: usize = 1000;
const TRUNCATED_SUFFIX: &str = "... (truncated)";

/// Upper bound when buffering a request body for logging; matches axum's
/// default `Json` limit.
const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

fn new_request_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

fn is_json(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/json")
}

pub fn truncate_for_log(body: &str) -> Cow<'_, str> {
    match body.char_indices().nth(MAX_LOGGED_BODY) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &body[..cut], TRUNCATED_SUFFIX)),
        None => Cow::Borrowed(body),
    }
}

/// Request/response logging for API routes.
///
/// Tags each exchange with a short request id (echoed as `x-request-id`),
/// logs JSON bodies in both directions and records request metrics.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let request_id = new_request_id();
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let query = req.uri().query().unwrap_or_default().to_owned();
    let content_type = header_str(req.headers(), CONTENT_TYPE);
    let user_agent = header_str(req.headers(), USER_AGENT);

    info!(%request_id, %method, %path, %query, %content_type, %user_agent, "incoming request");

    let req = if is_json(&content_type) {
        let (parts, body) = req.into_parts();
        match to_bytes(body, REQUEST_BODY_LIMIT).await {
            Ok(bytes) => {
                info!(%request_id, body = %truncate_for_log(&String::from_utf8_lossy(&bytes)), "request body");
                Request::from_parts(parts, Body::from(bytes))
            }
            Err(e) => {
                let res = Fault::InvalidArgument(format!("Failed to read request body: {e}")).into_response();
                return finish(res, &request_id, method.as_str(), &path, started).await;
            }
        }
    } else {
        req
    };

    let res = next.run(req).await;
    finish(res, &request_id, method.as_str(), &path, started).await
}

async fn finish(res: Response, request_id: &str, method: &str, path: &str, started: Instant) -> Response {
    let status = res.status();
    let content_type = header_str(res.headers(), CONTENT_TYPE);

    let mut res = if is_json(&content_type) {
        let (parts, body) = res.into_parts();
        match to_bytes(body, usize::MAX).await {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                if status.as_u16() >= 400 {
                    warn!(%request_id, body = %truncate_for_log(&text), "response body");
                } else {
                    info!(%request_id, body = %truncate_for_log(&text), "response body");
                }
                Response::from_parts(parts, Body::from(bytes))
            }
            Err(e) => {
                error!(%request_id, error = %e, "failed to buffer response body");
                Fault::Other(e.to_string()).into_response()
            }
        }
    } else {
        res
    };

    let elapsed = started.elapsed();
    let duration_ms = elapsed.as_millis() as u64;
    if status.as_u16() >= 400 {
        warn!(%request_id, method, path, status = status.as_u16(), %content_type, duration_ms, "request completed with error");
    } else {
        info!(%request_id, method, path, status = status.as_u16(), %content_type, duration_ms, "request completed");
    }
    metrics::observe(method, res.status().as_u16(), elapsed.as_secs_f64());

    if let Ok(value) = HeaderValue::from_str(request_id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

fn panic_detail(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Render a panic that escaped every per-operation layer as the 500 fault
/// envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic_detail(err.as_ref());
    error!(panic = %detail, "handler panicked");
    Fault::Other(detail).into_response()
}

/// Panic capture for a single operation. The client gets
/// `An error occurred while {action}` and a 500; the payload is only logged.
pub fn catch_panic(
    action: impl Into<String>,
) -> CatchPanicLayer<impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone + Send + Sync + 'static> {
    let message = format!("An error occurred while {}", action.into());
    CatchPanicLayer::custom(move |err: Box<dyn Any + Send + 'static>| {
        error!(panic = %panic_detail(err.as_ref()), context = %message, "handler panicked");
        let body = ApiResponse::<()>::failure(message.clone(), None);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    })
}

/// Error handler for the timeout layer.
pub async fn handle_timeout(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        Fault::Timeout("The request did not complete in time".into()).into_response()
    } else {
        Fault::Other(err.to_string()).into_response()
    }
}

/// Unknown `/api/*` routes get the 404 envelope; anything else a bare 404.
pub async fn fallback(uri: Uri) -> Response {
    if uri.path().starts_with("/api") {
        Fault::NotFound(format!("No route matches {}", uri.path())).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
