use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("histogram needs at least one bin")]
    ZeroBins,
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
