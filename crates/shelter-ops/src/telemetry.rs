//! Tracing setup for the shelter service.
//!
//! Development gets a human-oriented pretty format with ANSI colors; test and
//! production runs emit the compact single-line format log shippers expect.

use crate::config::{AppEnvironment, TelemetryConfig};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    Filter {
        value: String,
        source: ParseError,
    },
    #[error("failed to install tracing subscriber")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Pick the active log filter. `RUST_LOG` wins over the configured level so
/// operators can raise verbosity without touching service config.
fn resolve_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
        value: config.log_level.clone(),
        source,
    })
}

/// Install the global tracing subscriber.
pub fn init(environment: AppEnvironment, config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let builder = tracing_subscriber::fmt().with_env_filter(resolve_filter(config)?);

    match environment {
        AppEnvironment::Development => builder.pretty().try_init(),
        AppEnvironment::Test | AppEnvironment::Production => builder
            .with_target(false)
            .with_ansi(false)
            .compact()
            .try_init(),
    }
    .map_err(TelemetryError::Install)
}
