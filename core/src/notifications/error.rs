//! Error types for notification delivery

use thiserror::Error;

/// Errors from a delivery backend. Logged by the worker, never propagated.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to launch '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("delivery failed: {reason}")]
    Failed { reason: String },
}
