//! Single-sample detection logic
//!
//! Everything here is synchronous and deterministic given a scorer, so the
//! sampling loop stays a thin scheduling shell around `Sampler::sample`.

use super::engine::DetectionEvent;
use super::error::DetectionError;

/// Capture-and-compare backend.
///
/// `capture` grabs the current frame (cost opaque to the tracker); `score`
/// returns the similarity of one template against that frame, in `[0, 1]`.
pub trait Scorer: Send + 'static {
    type Frame;

    fn capture(&mut self) -> Result<Self::Frame, DetectionError>;

    fn score(&self, template_key: &str, frame: &Self::Frame) -> Result<f32, DetectionError>;
}

/// Reference template and the boss it identifies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub key: String,
    pub boss: String,
}

impl Template {
    pub fn new(key: impl Into<String>, boss: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            boss: boss.into(),
        }
    }
}

impl From<&respawn_types::TemplateConfig> for Template {
    fn from(config: &respawn_types::TemplateConfig) -> Self {
        Self::new(config.key.clone(), config.boss.clone())
    }
}

/// Index of the first score at or above `threshold`.
///
/// Later qualifying templates are not compared further.
pub fn select_match(scores: &[f32], threshold: f32) -> Option<usize> {
    scores.iter().position(|&s| s >= threshold)
}

/// Suppresses repeats of the same template across consecutive samples
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    last_matched: Option<String>,
}

impl Deduplicator {
    /// Feed one sample's selection. Returns true when it should be emitted.
    ///
    /// A sample with no match clears the memory, so the same template firing
    /// again later counts as a new observation.
    pub fn observe(&mut self, selected: Option<&str>) -> bool {
        match selected {
            None => {
                self.last_matched = None;
                false
            }
            Some(key) if self.last_matched.as_deref() == Some(key) => false,
            Some(key) => {
                self.last_matched = Some(key.to_string());
                true
            }
        }
    }

    pub fn last_matched(&self) -> Option<&str> {
        self.last_matched.as_deref()
    }

    pub fn reset(&mut self) {
        self.last_matched = None;
    }
}

/// Scorer plus the state one sampling loop carries between samples
pub struct Sampler<S: Scorer> {
    scorer: S,
    templates: Vec<Template>,
    threshold: f32,
    dedup: Deduplicator,
}

impl<S: Scorer> Sampler<S> {
    pub fn new(scorer: S, templates: Vec<Template>, threshold: f32) -> Self {
        Self {
            scorer,
            templates,
            threshold,
            dedup: Deduplicator::default(),
        }
    }

    pub fn reset(&mut self) {
        self.dedup.reset();
    }

    /// Take one sample.
    ///
    /// On error the dedup memory is left untouched; the sample simply did not
    /// happen.
    pub fn sample(&mut self) -> Result<Option<DetectionEvent>, DetectionError> {
        let frame = self.scorer.capture()?;

        let mut scores = Vec::with_capacity(self.templates.len());
        for template in &self.templates {
            let score = self.scorer.score(&template.key, &frame)?;
            scores.push(score);
            // Nothing after the first qualifying template can change the result
            if score >= self.threshold {
                break;
            }
        }

        let selected = select_match(&scores, self.threshold);
        let key = selected.map(|i| self.templates[i].key.as_str());
        if !self.dedup.observe(key) {
            return Ok(None);
        }

        Ok(selected.map(|i| {
            let template = &self.templates[i];
            tracing::debug!(template = %template.key, boss = %template.boss, score = scores[i], "Template matched");
            DetectionEvent {
                template_key: template.key.clone(),
                boss: template.boss.clone(),
            }
        }))
    }
}
