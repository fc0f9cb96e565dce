//! REST routes: cleanse endpoint, status page, health checks and metrics.

use std::time::Instant;

use axum::body::Bytes;
use axum::Extension;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use cleanse_core::{CleanseRequest, CleanseResponse};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};
use crate::middleware::ReceivedAt;
use crate::startup::AppState;
use crate::status_page::CLEANSE_PATH;

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Build REST routes with the given application state.
///
/// `/metrics` is only mounted when a Prometheus handle is present.
pub fn rest_routes(state: AppState) -> Router {
    let metrics_handle = state.metrics.clone();

    let router = Router::new()
        .route("/", get(status_page_handler))
        .route(CLEANSE_PATH, post(cleanse_handler))
        .route("/health", get(|| async { "OK" }))
        .route("/health/live", get(|| async { "OK" }))
        .route("/health/ready", get(readiness_handler))
        .with_state(state);

    match metrics_handle {
        Some(handle) => router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        ),
        None => router,
    }
}

/// `POST /api/v1/cleanse`.
///
/// Invalid emails and phone numbers are reported in a 200 response; anything
/// that prevents reading the record yields the generic 500 envelope.
///
/// `processing_ms` counts from the [`ReceivedAt`] stamp, so it includes body
/// receipt. Without the middleware it counts from handler entry.
#[instrument(skip_all)]
async fn cleanse_handler(
    State(state): State<AppState>,
    received: Option<Extension<ReceivedAt>>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<CleanseResponse>> {
    let started = received.map_or_else(Instant::now, |Extension(ReceivedAt(at))| at);

    let body = body.map_err(|e| AppError::Internal(format!("failed to read body: {e}")))?;
    let request = CleanseRequest::from_slice(&body)?;
    let record = state.cleanser.cleanse(&request);

    let email_valid = bool_label(record.contact.is_email_valid);
    let phone_valid = bool_label(record.contact.is_phone_valid);
    metrics::counter!(
        "cleanse_records_total",
        "email_valid" => email_valid,
        "phone_valid" => phone_valid
    )
    .increment(1);
    debug!(email_valid, phone_valid, "Record cleansed");

    Ok(Json(CleanseResponse::success(record, started.elapsed())))
}

const fn bool_label(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

async fn status_page_handler(State(state): State<AppState>) -> Html<Bytes> {
    Html(state.status_page)
}

async fn readiness_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::tests::test_config;

    fn routes() -> Router {
        rest_routes(AppState::new(&test_config(), None))
    }

    #[tokio::test]
    async fn liveness_is_plain_ok() {
        for path in ["/health", "/health/live"] {
            let response = routes()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], b"OK");
        }
    }

    #[tokio::test]
    async fn cleanse_rejects_get() {
        let response = routes()
            .oneshot(Request::get(CLEANSE_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn cleanse_ignores_content_type() {
        let response = routes()
            .oneshot(
                Request::post(CLEANSE_PATH)
                    .body(Body::from(r#"{"firstName":"bob"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["data"]["identity"]["fullName"], "Bob");
    }

    #[tokio::test]
    async fn processing_time_counts_from_receipt() {
        let received = Instant::now()
            .checked_sub(Duration::from_millis(250))
            .unwrap();
        let mut request = Request::post(CLEANSE_PATH).body(Body::from("{}")).unwrap();
        request.extensions_mut().insert(ReceivedAt(received));

        let response = routes().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value["meta"]["processing_ms"].as_u64().unwrap() >= 250);
    }

    #[test]
    fn bool_labels() {
        assert_eq!(bool_label(true), "true");
        assert_eq!(bool_label(false), "false");
    }
}
