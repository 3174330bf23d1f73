//! Tracing subscriber setup.

use anyhow::Result;
use petri_core::LogFormat;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Logs go to stderr so stdout stays free for
/// the rendered grid.
pub fn init_telemetry(format: LogFormat) -> Result<()> {
    let (pretty, json) = match format {
        LogFormat::Pretty => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,petri_runner=debug,petri_world=debug".into()),
        )
        .with(pretty)
        .with(json)
        .try_init()?;

    info!(?format, "Telemetry initialized");
    Ok(())
}
