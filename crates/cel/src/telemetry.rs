//! Structured logging set-up for applications embedding the framework.
//!
//! The library itself only emits `tracing` events under the `cel::*`
//! targets: unresolved routes, unwired dependencies and skipped bindings are
//! reported that way rather than as errors, so they are invisible without a
//! subscriber. Hosts that already install one ignore this module. Hosts that
//! do not can call [`initialise`] once at start-up to print those events to
//! stderr, driven by the same [`CelConfig`] that configures routing and
//! resolution.

use std::io::{self, IsTerminal};

use cel_config::{CelConfig, LogFormat};
use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global tracing subscriber on the first call.
///
/// Later calls return a fresh [`TelemetryHandle`] without touching global
/// state. A failed first call leaves the guard unset, so a corrected
/// configuration can be retried.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the filter expression does not
/// parse and [`TelemetryError::Subscriber`] when another subscriber is
/// already installed globally.
///
/// # Examples
///
/// ```rust
/// use cel::{CelConfig, telemetry};
///
/// # fn main() -> Result<(), cel::telemetry::TelemetryError> {
/// let config = CelConfig::default();
/// let first = telemetry::initialise(&config)?;
/// let second = telemetry::initialise(&config)?;
/// drop(first);
/// drop(second);
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &CelConfig) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|()| TelemetryHandle)
}

fn build_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn install_subscriber(config: &CelConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config.log_filter())?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::level("debug")]
    #[case::directive("cel::router=warn,info")]
    fn build_filter_accepts_valid_expressions(#[case] expression: &str) {
        assert!(build_filter(expression).is_ok());
    }

    #[test]
    fn build_filter_rejects_malformed_expression() {
        let err = build_filter("cel=notalevel").expect_err("invalid level");
        assert!(matches!(err, TelemetryError::Filter(_)));
        assert!(err.to_string().starts_with("invalid log filter"));
    }
}
