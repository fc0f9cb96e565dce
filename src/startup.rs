//! Server startup and wiring.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use cleanse_core::Cleanser;
use cleanse_telemetry::PrometheusHandle;
use http::Request;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Level;

use crate::config::Config;
use crate::error::panic_response;
use crate::middleware::{MetricsLayer, RequestIdLayer, SecurityHeadersLayer};
use crate::routes::rest_routes;
use crate::status_page;

/// CORS preflight cache duration.
const CORS_MAX_AGE_SECS: u64 = 3600;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub cleanser: Arc<Cleanser>,
    /// Pre-rendered status page.
    pub status_page: Bytes,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state from configuration with the library-backed normalizers.
    pub fn new(config: &Config, metrics: Option<PrometheusHandle>) -> Self {
        let cleanser = Cleanser::default()
            .with_default_country(config.default_country.trim().to_ascii_uppercase());
        Self::with_cleanser(config, cleanser, metrics)
    }

    /// Build state around a specific cleanser.
    pub fn with_cleanser(
        config: &Config,
        cleanser: Cleanser,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            cleanser: Arc::new(cleanser),
            status_page: Bytes::from(status_page::render(config.environment_label())),
            metrics,
        }
    }
}

/// Build the complete application: routes plus the middleware stack.
pub fn build_app(config: &Config, state: AppState) -> Router {
    let cors = build_cors(config.cors_allow_origins.as_deref());

    // Executes top-to-bottom on request. Tracing comes first so the request
    // span is current when the request id is recorded into it.
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = tracing::field::Empty,
                    )
                })
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(RequestIdLayer::new())
        .layer(MetricsLayer::new())
        .layer(SecurityHeadersLayer::new())
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response));

    rest_routes(state).layer(middleware)
}

fn build_cors(origins: Option<&str>) -> CorsLayer {
    let cors = match origins {
        Some(o) if o.trim() == "*" => CorsLayer::permissive(),
        Some(o) => {
            let origins: Vec<_> = o.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            CorsLayer::new().allow_origin(origins)
        }
        None => CorsLayer::permissive(),
    };

    cors.allow_headers(Any)
        .expose_headers([http::HeaderName::from_static(
            crate::middleware::request_id::REQUEST_ID_HEADER,
        )])
        .allow_methods(Any)
        .max_age(Duration::from_secs(CORS_MAX_AGE_SECS))
}
