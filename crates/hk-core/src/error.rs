use hk_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid run plan: {0}")]
    InvalidPlan(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("slot {index} out of range ({len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("slot {index} written twice")]
    SlotTaken { index: usize },

    #[error("concurrency gate closed")]
    GateClosed,
}
