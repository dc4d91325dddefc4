//! Tracing subscriber setup.
//!
//! The `[logging]` section of the service config picks the output
//! format: `json` for log shipping, anything else gets the pretty
//! human-readable layer. A `RUST_LOG` environment variable overrides
//! the configured level filter.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

#[derive(Debug, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn from_config(format: &str) -> Self {
        match format {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Installs the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_config(&config.format) {
        LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
        LogFormat::Pretty => {
            registry
                .with(fmt::layer().pretty().with_span_events(FmtSpan::CLOSE))
                .init();
        }
    }
}
