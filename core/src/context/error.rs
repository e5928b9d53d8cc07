//! Error types for context operations

use thiserror::Error;

/// Errors during configuration loading, saving and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("roster is empty")]
    EmptyRoster,

    #[error("boss '{name}' appears more than once in the roster")]
    DuplicateBoss { name: String },

    #[error("roster entry {index} has a blank name")]
    BlankBossName { index: usize },

    #[error("timer duration must be at least one second")]
    InvalidDuration,

    #[error("pre-alert ({pre_alert}s) must be shorter than the timer duration ({duration}s)")]
    InvalidPreAlert { pre_alert: u32, duration: u32 },

    #[error("sample period must be at least one millisecond")]
    InvalidSamplePeriod,

    #[error("match threshold {threshold} is outside (0, 1]")]
    InvalidThreshold { threshold: f32 },

    #[error("template '{key}' is configured more than once")]
    DuplicateTemplate { key: String },

    #[error("template '{key}' maps to unknown boss '{boss}'")]
    TemplateBossUnknown { key: String, boss: String },
}
