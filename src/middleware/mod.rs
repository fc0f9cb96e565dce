//! Tower middleware shared by every route.
//!
//! # Middleware Order
//! Middleware is applied in layers. When using `.layer()` on a router:
//! - Outermost layer is added last
//! - Request flows: outermost → innermost → handler
//! - Response flows: handler → innermost → outermost
//!
//! Order used by `startup::build_app` (outermost first):
//! 1. TraceLayer - Request span, opened before anything else runs
//! 2. RequestIdLayer - Extract/generate request ID, record it into the span
//!    and stamp the receipt time
//! 3. MetricsLayer - Request count and latency
//! 4. SecurityHeadersLayer - Hardening headers on every response
//! 5. TimeoutLayer - Request timeout
//! 6. CorsLayer - CORS handling
//! 7. CatchPanicLayer - Panics become the generic 500 envelope

pub mod metrics;
pub mod request_id;
pub mod security_headers;

pub use metrics::MetricsLayer;
pub use request_id::{ReceivedAt, RequestId, RequestIdLayer};
pub use security_headers::SecurityHeadersLayer;
