use thiserror::Error;

/// Errors raised while building model values (before anything runs).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("command is empty")]
    EmptyCommand,
    #[error("invocation count overflows: {producers} producers x {scripts} scripts")]
    ShapeOverflow { producers: usize, scripts: usize },
    #[error("outcome count mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// Why a single invocation did not produce a timing record.
///
/// Causes carry the rendered source error so that outcomes stay `Clone`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("non-zero exit code: {code}")]
    NonZeroExit { code: i32 },
    #[error("killed by signal")]
    KilledBySignal,
    #[error("io error: {0}")]
    Io(String),
    #[error("invocation aborted: {0}")]
    Aborted(String),
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Coarse classification of an [`InvocationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The process could not be started, failed, or its output could not be read.
    Execution,
    /// The process succeeded but stdout was not a valid timing record.
    Decode,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Execution => "execution",
            FailureKind::Decode => "decode",
        }
    }
}

impl InvocationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            InvocationError::Decode(_) => FailureKind::Decode,
            InvocationError::Spawn(_)
            | InvocationError::NonZeroExit { .. }
            | InvocationError::KilledBySignal
            | InvocationError::Io(_)
            | InvocationError::Aborted(_) => FailureKind::Execution,
        }
    }
}

impl From<std::io::Error> for InvocationError {
    fn from(e: std::io::Error) -> Self {
        InvocationError::Io(e.to_string())
    }
}
