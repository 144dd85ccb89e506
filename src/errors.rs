use thiserror::Error;

use crate::dispatch::DispatchAction;

/// Contract errors surfaced past the engine boundary. Everything else
/// (clamped ratings, pruned selections) is recovered locally and reported as
/// warnings or events, never as errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid lead record: {0}")]
    Validation(String),

    #[error("no leads selected for `{action}` - select at least one lead first")]
    EmptySelection { action: DispatchAction },

    #[error("insufficient credits for `{action}`: need {required}, have {balance}")]
    InsufficientCredits {
        action: DispatchAction,
        required: u64,
        balance: u64,
    },
}

impl EngineError {
    /// Exact top-up amount needed to retry a blocked dispatch.
    pub fn shortfall(&self) -> Option<u64> {
        match self {
            EngineError::InsufficientCredits {
                required, balance, ..
            } => Some(required - balance),
            _ => None,
        }
    }
}
