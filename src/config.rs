//! Configuration from CLI arguments and environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use cleanse_core::{DEFAULT_COUNTRY, parse_region};
use cleanse_telemetry::TelemetryConfig;
use clap::Parser;

/// Environment label shown on the status page when none is configured.
const DEFAULT_ENVIRONMENT: &str = "Production";

/// Contact cleansing REST service configuration.
///
/// All values can be set via environment variables or CLI arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "cleanse-service", about = "Contact record cleansing REST service")]
pub struct Config {
    /// Bind host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Region hint used when a request omits `country` (ISO 3166-1 alpha-2)
    #[arg(long, env = "DEFAULT_COUNTRY", default_value = DEFAULT_COUNTRY)]
    pub default_country: String,

    /// CORS allowed origins (comma-separated, or "*" for any)
    #[arg(long, env = "CORS_ALLOW_ORIGINS")]
    pub cors_allow_origins: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Use JSON log format
    #[arg(long, env = "JSON_LOGS", default_value = "true")]
    pub json_logs: bool,

    /// OpenTelemetry OTLP endpoint
    #[arg(long, env = "OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Sentry DSN for error tracking
    #[arg(long, env = "SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Environment name (e.g., "production", "development")
    #[arg(long, env = "ENVIRONMENT")]
    pub environment: Option<String>,
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Request timeout must be > 0")]
    InvalidRequestTimeout,
    #[error("Unknown default country: {0}")]
    UnknownDefaultCountry(String),
    #[error("Invalid listen address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },
}

impl Config {
    /// Parse and validate configuration.
    pub fn init() -> anyhow::Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidRequestTimeout);
        }
        if parse_region(&self.default_country).is_none() {
            return Err(ConfigError::UnknownDefaultCountry(
                self.default_country.clone(),
            ));
        }
        self.listen_address()?;
        Ok(())
    }

    /// Socket address to bind.
    pub fn listen_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                host: self.host.clone(),
                port: self.port,
            })
    }

    /// Get request timeout as Duration.
    #[inline]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Environment label for the status page.
    pub fn environment_label(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    /// Telemetry settings derived from this configuration.
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
            otlp_endpoint: self.otlp_endpoint.clone(),
            sentry_dsn: self.sentry_dsn.clone(),
            environment: self.environment.clone(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}
