use std::io::IsTerminal;

use crate::logger::{console::Console, format::LogFormat};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. `info` or `hk.core.scheduler=debug,warn`.
    pub filter: String,
    pub with_targets: bool,
    pub use_color: bool,
    /// Destination of text and JSON events.
    pub console: Console,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "warn".to_string(),
            with_targets: true,
            use_color: std::io::stderr().is_terminal(),
            console: Console::stderr(),
        }
    }
}
