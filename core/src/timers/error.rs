//! Error types for timer operations

use thiserror::Error;

/// Errors from the timer registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("unknown boss '{name}'")]
    UnknownBoss { name: String },
}
