//! Error types for detection sampling

use thiserror::Error;

/// A transient sampling failure. The current sample is skipped and the loop
/// retries on the next period.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("frame capture failed: {reason}")]
    Capture { reason: String },

    #[error("failed to score template '{key}': {reason}")]
    Score { key: String, reason: String },
}
