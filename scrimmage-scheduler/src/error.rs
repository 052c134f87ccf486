//! Scheduler error types.

use scrimmage_core::ConfigError;
use thiserror::Error;

/// Errors that can stop schedule generation.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("generation cancelled after {completed_rounds} rounds")]
    Cancelled { completed_rounds: usize },

    #[error("round {round}: play pool of {pool_size} is not a multiple of {match_size}")]
    UnbalancedPool {
        round: usize,
        pool_size: usize,
        match_size: usize,
    },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
