use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::cache::metric_names;
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
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
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            metric_names::HIT,
            Unit::Count,
            "Total number of feed cache hits."
        );
        describe_counter!(
            metric_names::MISS,
            Unit::Count,
            "Total number of feed cache misses, expired entries included."
        );
        describe_counter!(
            metric_names::EVICT,
            Unit::Count,
            "Total number of feed pages evicted due to capacity."
        );
        describe_counter!(
            metric_names::EXPIRED,
            Unit::Count,
            "Total number of expired feed pages purged by the sweep."
        );
        describe_counter!(
            metric_names::INVALIDATED,
            Unit::Count,
            "Total number of feed pages removed by entity invalidation."
        );
        describe_histogram!(
            metric_names::CONSUME_MS,
            Unit::Milliseconds,
            "Latency of applying one write's cache invalidation, in milliseconds."
        );
    });
}
