use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use configs::{AppConfig, CorsConfig, LogFormat};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::routes;
use crate::state::AppState;

/// Initialize logging via shared common utils
pub fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => init_logging_default(),
        LogFormat::Json => init_logging_json(),
    }
}

/// Empty origin list allows any origin.
pub fn build_cors(cfg: &CorsConfig) -> CorsLayer {
    if cfg.allowed_origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "skipping unparsable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn request_timeout(cfg: &AppConfig) -> Option<Duration> {
    match cfg.server.request_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

/// Assemble state and router from configuration.
pub fn build_app(cfg: &AppConfig) -> Router {
    let state = AppState::new(cfg.store.seed_sample_data);
    routes::build_router(state, build_cors(&cfg.cors), request_timeout(cfg))
}

/// Bind and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg);
    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local = listener.local_addr()?;
    info!(%local, seeded = cfg.store.seed_sample_data, timeout_secs = cfg.server.request_timeout_secs, "storefront listening");
    info!(
        endpoints = "/api/products, /api/customers, /health, /metrics, /api-docs/openapi.json",
        "available endpoints"
    );
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped accepting connections");
    Ok(())
}
