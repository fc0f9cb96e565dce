//! Request ID propagation via the `x-request-id` header.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{HeaderValue, Request, Response};
use tower::{Layer, Service};
use tracing::Span;
use uuid::Uuid;

/// Header name for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Maximum accepted length for caller-supplied request IDs.
const MAX_REQUEST_ID_LENGTH: usize = 64;

/// Request ID for the current request, stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(Arc<str>);

impl RequestId {
    /// Generate a new random request ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    /// Accept a caller-supplied ID if it is printable ASCII and not too long.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        let valid = !value.is_empty()
            && value.len() <= MAX_REQUEST_ID_LENGTH
            && value.bytes().all(|b| b.is_ascii_graphic());
        valid.then(|| Self(value.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Moment the request entered the service, stored in request extensions.
#[derive(Debug, Clone, Copy)]
pub struct ReceivedAt(pub Instant);

/// Tower layer for request ID propagation.
#[derive(Clone, Copy, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Request ID middleware service.
#[derive(Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestIdMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        req.extensions_mut().insert(ReceivedAt(Instant::now()));
        let request_id = extract_or_generate(&req);
        Span::current().record("request_id", request_id.as_str());
        let header = HeaderValue::from_str(request_id.as_str()).ok();
        req.extensions_mut().insert(request_id);

        // Take the readied service, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            if let Some(value) = header {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            Ok(response)
        })
    }
}

fn extract_or_generate<T>(req: &Request<T>) -> RequestId {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(RequestId::from_header)
        .unwrap_or_else(RequestId::generate)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use tower::{ServiceExt, service_fn};

    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(
            RequestId::generate().as_str(),
            RequestId::generate().as_str()
        );
    }

    #[test]
    fn header_values_are_screened() {
        assert_eq!(
            RequestId::from_header("custom-id").map(|id| id.to_string()),
            Some("custom-id".to_string())
        );
        assert!(RequestId::from_header("").is_none());
        assert!(RequestId::from_header("has space").is_none());
        assert!(RequestId::from_header(&"a".repeat(65)).is_none());
    }

    #[tokio::test]
    async fn echoes_incoming_id() {
        let svc = RequestIdLayer::new().layer(service_fn(|req: Request<()>| async move {
            let id = req.extensions().get::<RequestId>().map(ToString::to_string);
            Ok::<_, Infallible>(Response::new(id))
        }));

        let req = Request::builder()
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(())
            .unwrap();
        let response = svc.oneshot(req).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
        assert_eq!(response.body().as_deref(), Some("abc-123"));
    }

    #[tokio::test]
    async fn stamps_receipt_time() {
        let before = Instant::now();
        let svc = RequestIdLayer::new().layer(service_fn(|req: Request<()>| async move {
            let received = req.extensions().get::<ReceivedAt>().map(|r| r.0);
            Ok::<_, Infallible>(Response::new(received))
        }));

        let response = svc.oneshot(Request::new(())).await.unwrap();
        let received = response.body().expect("receipt time recorded");
        assert!(received >= before);
    }

    #[tokio::test]
    async fn generates_missing_id() {
        let svc = RequestIdLayer::new().layer(service_fn(|_req: Request<()>| async {
            Ok::<_, Infallible>(Response::new(()))
        }));

        let response = svc.oneshot(Request::new(())).await.unwrap();
        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }
}
