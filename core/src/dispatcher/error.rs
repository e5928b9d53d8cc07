//! Error types for dispatcher requests

use thiserror::Error;

use crate::timers::TimerError;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error("dispatcher is not running")]
    Closed,
}
