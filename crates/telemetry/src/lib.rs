//! Telemetry setup for the cleanse service.
//!
//! - **Tracing**: structured console logs, optionally exported over OTLP
//! - **Metrics**: Prometheus recorder for the `/metrics` endpoint
//! - **Error tracking**: Sentry, fed from `tracing` error events
//!
//! # Features
//! - `otlp` (default): OpenTelemetry OTLP exporter
//! - `prometheus` (default): Prometheus metrics exporter
//! - `sentry` (default): Sentry error tracking

use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "prometheus")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "otlp")]
use opentelemetry_sdk::trace::SdkTracerProvider;

/// Service name reported to exporters.
pub const SERVICE_NAME: &str = "cleanse-service";

/// Noisy dependency targets capped regardless of the configured level.
const QUIET_TARGETS: &[&str] = &["tower=info", "h2=info", "hyper=info", "sentry=warn"];

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: String,
    /// Use JSON log format
    pub json_logs: bool,
    /// OpenTelemetry OTLP endpoint (optional)
    pub otlp_endpoint: Option<String>,
    /// Sentry DSN (optional)
    pub sentry_dsn: Option<String>,
    /// Environment name (e.g., "production", "development")
    pub environment: Option<String>,
    /// Application version
    pub version: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            json_logs: true,
            otlp_endpoint: None,
            sentry_dsn: None,
            environment: None,
            version: None,
        }
    }
}

/// Active telemetry handles that need graceful shutdown.
#[must_use = "dropping the guard disables Sentry and skips the OTLP flush"]
pub struct TelemetryGuard {
    #[cfg(feature = "otlp")]
    otel_provider: Option<SdkTracerProvider>,
    #[cfg(feature = "sentry")]
    _sentry_guard: Option<sentry::ClientInitGuard>,
}

impl TelemetryGuard {
    /// Flush and shut down exporters.
    pub fn shutdown(self) {
        #[cfg(feature = "otlp")]
        if let Some(provider) = self.otel_provider
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shutdown OpenTelemetry provider: {e}");
        }
    }
}

/// Parse a log level name, falling back to INFO.
fn parse_level(name: &str) -> Level {
    match name.trim().to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn env_filter(level: Level) -> EnvFilter {
    QUIET_TARGETS
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(
            EnvFilter::from_default_env().add_directive(level.into()),
            EnvFilter::add_directive,
        )
}

/// Install the Prometheus recorder and return the handle for the `/metrics` endpoint.
///
/// # Panics
/// Panics if a global metrics recorder is already installed.
#[cfg(feature = "prometheus")]
#[must_use]
pub fn init_metrics() -> PrometheusHandle {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Build the OTLP tracer provider. Returns `None` if no endpoint is configured
/// or the exporter cannot be built.
#[cfg(feature = "otlp")]
fn init_opentelemetry(otlp_endpoint: Option<&str>) -> Option<SdkTracerProvider> {
    use std::time::Duration;

    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::{Resource, trace::Sampler};

    let endpoint = otlp_endpoint?;

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(Duration::from_secs(5))
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("Failed to create OTLP exporter, tracing export disabled: {e}");
            return None;
        }
    };

    let resource = Resource::builder()
        .with_attributes([KeyValue::new("service.name", SERVICE_NAME)])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());

    Some(provider)
}

/// Initialize Sentry. Returns `None` if no DSN is configured.
#[cfg(feature = "sentry")]
fn init_sentry(config: &TelemetryConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: config.version.clone().map(Into::into),
            environment: config.environment.clone().map(Into::into),
            attach_stacktrace: true,
            // Request payloads are contact records
            send_default_pii: false,
            ..Default::default()
        },
    ));

    guard.is_enabled().then_some(guard)
}

/// Set up the logging/tracing stack.
///
/// Keep the returned guard alive for the process lifetime and call
/// [`TelemetryGuard::shutdown`] on exit.
///
/// # Panics
/// Panics if a global tracing subscriber is already installed.
pub fn setup_telemetry(config: &TelemetryConfig) -> TelemetryGuard {
    #[cfg(feature = "sentry")]
    let sentry_guard = init_sentry(config);

    #[cfg(feature = "otlp")]
    let otel_provider = init_opentelemetry(config.otlp_endpoint.as_deref());

    let fmt_layer = if config.json_logs {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_timer(ChronoLocal::new("%H:%M:%S%.3f".to_string()))
            .compact()
            .boxed()
    };

    #[cfg(feature = "otlp")]
    let otel_layer = otel_provider.as_ref().map(|provider| {
        use opentelemetry::trace::TracerProvider as _;
        tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME))
    });
    #[cfg(not(feature = "otlp"))]
    let otel_layer: Option<tracing_subscriber::layer::Identity> = None;

    #[cfg(feature = "sentry")]
    let sentry_layer = sentry_guard.as_ref().map(|_| sentry_tracing::layer());
    #[cfg(not(feature = "sentry"))]
    let sentry_layer: Option<tracing_subscriber::layer::Identity> = None;

    tracing_subscriber::registry()
        .with(env_filter(parse_level(&config.log_level)))
        .with(fmt_layer)
        .with(otel_layer)
        .with(sentry_layer)
        .init();

    if config.otlp_endpoint.is_some() {
        tracing::info!("OpenTelemetry export configured");
    }
    if config.sentry_dsn.is_some() {
        tracing::info!("Sentry configured");
    }

    TelemetryGuard {
        #[cfg(feature = "otlp")]
        otel_provider,
        #[cfg(feature = "sentry")]
        _sentry_guard: sentry_guard,
    }
}
