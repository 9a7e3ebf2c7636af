//! Tracing subscriber installation and metric descriptions.

use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use thiserror::Error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

static METRIC_DESCRIPTIONS: Once = Once::new();

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), TelemetryError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| TelemetryError::Install(err.to_string()))
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            crate::cache::METRIC_CACHE_HIT,
            Unit::Count,
            "Total number of document cache hits."
        );
        describe_counter!(
            crate::cache::METRIC_CACHE_MISS,
            Unit::Count,
            "Total number of document cache misses."
        );
        describe_counter!(
            crate::cache::METRIC_CACHE_EVICT,
            Unit::Count,
            "Total number of document cache evictions due to capacity."
        );
        describe_counter!(
            crate::cache::METRIC_CACHE_EXPIRED,
            Unit::Count,
            "Total number of document cache entries dropped past their expiry."
        );
        describe_counter!(
            crate::render::METRIC_PARSE,
            Unit::Count,
            "Total number of markup parse invocations."
        );
        describe_histogram!(
            crate::render::METRIC_RENDER_MS,
            Unit::Milliseconds,
            "Renderer output production latency in milliseconds."
        );
    });
}
