//! Scorer fed by hand from the shell
//!
//! Stands in for a screen-capture backend: `observe` commands set the score a
//! template gets on every following frame until changed or cleared.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use respawn_core::{DetectionError, Scorer};

#[derive(Debug, Clone, Default)]
pub struct InjectedScorer {
    scores: Arc<Mutex<HashMap<String, f32>>>,
}

impl InjectedScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `score` for `template`, clamped to `0.0..=1.0`. Returns the
    /// value frames will carry from now on.
    pub fn set(&self, template: &str, score: f32) -> f32 {
        let score = score.clamp(0.0, 1.0);
        if let Ok(mut scores) = self.scores.lock() {
            scores.insert(template.to_string(), score);
        }
        score
    }

    pub fn clear(&self) {
        if let Ok(mut scores) = self.scores.lock() {
            scores.clear();
        }
    }

    pub fn current(&self) -> Vec<(String, f32)> {
        let mut scores: Vec<_> = self
            .scores
            .lock()
            .map(|s| s.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default();
        scores.sort_by(|a, b| a.0.cmp(&b.0));
        scores
    }
}

impl Scorer for InjectedScorer {
    type Frame = HashMap<String, f32>;

    fn capture(&mut self) -> Result<Self::Frame, DetectionError> {
        self.scores
            .lock()
            .map(|scores| scores.clone())
            .map_err(|_| DetectionError::Capture {
                reason: "score table poisoned".to_string(),
            })
    }

    fn score(&self, template_key: &str, frame: &Self::Frame) -> Result<f32, DetectionError> {
        Ok(frame.get(template_key).copied().unwrap_or(0.0))
    }
}
