use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("unknown log format `{0}`, expected one of: text, json, journald")]
    UnknownFormat(String),
    #[error("bad log filter `{directive}`: {reason}")]
    BadFilter { directive: String, reason: String },
    #[error("journald logging is not available in this build")]
    JournaldUnavailable,
    #[error("journald: {0}")]
    Journald(String),
    #[error("a global subscriber is already installed")]
    AlreadyInstalled,
}
