use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::OffsetTime},
    layer::{Layered, SubscriberExt},
};

use crate::logger::{config::LogConfig, error::LogError, format::LogFormat};

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

type Filtered = Layered<EnvFilter, Registry>;

/// Build the subscriber `cfg` describes without installing it.
pub fn subscriber(cfg: &LogConfig) -> Result<BoxedSubscriber, LogError> {
    let base = tracing_subscriber::registry().with(filter(&cfg.filter)?);
    match cfg.format {
        LogFormat::Text => Ok(Box::new(
            base.with(
                fmt::layer()
                    .with_writer(cfg.console.clone())
                    .with_ansi(cfg.use_color)
                    .with_target(cfg.with_targets)
                    .with_timer(timer()),
            ),
        )),
        LogFormat::Json => Ok(Box::new(
            base.with(
                fmt::layer()
                    .json()
                    .with_writer(cfg.console.clone())
                    .with_target(cfg.with_targets)
                    .with_current_span(false)
                    .with_timer(timer()),
            ),
        )),
        LogFormat::Journald => journald(base),
    }
}

/// Install the subscriber `cfg` describes as the process-wide default.
pub fn install(cfg: &LogConfig) -> Result<(), LogError> {
    let subscriber = subscriber(cfg)?;
    tracing::subscriber::set_global_default(subscriber).map_err(|_| LogError::AlreadyInstalled)
}

fn filter(directive: &str) -> Result<EnvFilter, LogError> {
    EnvFilter::try_new(directive).map_err(|e| LogError::BadFilter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

fn timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald(base: Filtered) -> Result<BoxedSubscriber, LogError> {
    let layer = tracing_journald::layer().map_err(|e| LogError::Journald(e.to_string()))?;
    Ok(Box::new(base.with(layer)))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald(_base: Filtered) -> Result<BoxedSubscriber, LogError> {
    Err(LogError::JournaldUnavailable)
}
