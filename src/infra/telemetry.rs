use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing::{Subscriber, level_filters::LevelFilter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

const COUNTERS: [(&str, &str); 3] = [
    (
        "linksly_subscriptions_total",
        "Launch-list signups appended to the subscriber log.",
    ),
    (
        "linksly_pages_rendered_total",
        "Pages rendered, labelled by mode (live or static).",
    ),
    (
        "linksly_page_render_failures_total",
        "Page renders that failed, labelled by mode (live or static).",
    ),
];

static DESCRIBE: Once = Once::new();

/// Install the global tracing subscriber and describe the crate's counters.
///
/// `RUST_LOG` directives take precedence over the configured level.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    DESCRIBE.call_once(|| {
        for (name, description) in COUNTERS {
            describe_counter!(name, Unit::Count, description);
        }
    });

    tracing_subscriber::registry()
        .with(env_filter(logging.level))
        .with(ErrorLayer::default())
        .with(output_layer(logging.format))
        .try_init()
        .map_err(|err| InfraError::telemetry(format!("tracing subscriber already set: {err}")))
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

fn output_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    }
}
