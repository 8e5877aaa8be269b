mod config;
mod console;
mod error;
mod format;
mod install;

pub use config::LogConfig;
pub use console::{Console, EventWriter};
pub use error::LogError;
pub use format::LogFormat;

/// Install the global `tracing` subscriber described by `cfg`.
///
/// Attach the progress bar to `cfg.console` while it is drawn so events do
/// not tear through it.
pub fn init(cfg: &LogConfig) -> Result<(), LogError> {
    install::install(cfg)
}
