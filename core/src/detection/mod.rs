//! Automated boss detection
//!
//! Periodically captures a frame, scores it against every reference template
//! and turns the noisy score stream into discrete "boss observed" events:
//! - **Scorer**: external capture-and-compare backend (`Scorer` trait)
//! - **Sampler**: one sample = capture, pick the first qualifying template, dedup
//! - **Engine**: background sampling loop with start/stop control

mod engine;
mod error;
mod sampler;

pub use engine::{DetectionEngine, DetectionEvent};
pub use error::DetectionError;
pub use sampler::{Deduplicator, Sampler, Scorer, Template, select_match};
