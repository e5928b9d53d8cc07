//! Application configuration
//!
//! This module re-exports shared types from respawn-types and provides
//! persistence and validation for AppConfig.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

// Re-export all shared types
pub use respawn_types::{
    AppConfig, DEFAULT_DURATION_SECS, DEFAULT_MATCH_THRESHOLD, DEFAULT_PRE_ALERT_SECS,
    DEFAULT_ROSTER, DEFAULT_SAMPLE_PERIOD_MS, DetectionSettings, NotificationSettings,
    TemplateConfig, TimerSettings,
};

use super::error::ConfigError;

const APP_NAME: &str = "respawn";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence and validation
pub trait AppConfigExt: Sized {
    /// Load from the platform config directory, falling back to defaults
    fn load() -> Self;
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match confy::load(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load configuration, using defaults");
                Self::default()
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        confy::load_path(path).map_err(ConfigError::Load)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }

        let mut names = HashSet::with_capacity(self.roster.len());
        for (index, name) in self.roster.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::BlankBossName { index });
            }
            if !names.insert(name.as_str()) {
                return Err(ConfigError::DuplicateBoss { name: name.clone() });
            }
        }

        let timers = &self.timers;
        if timers.duration_secs == 0 {
            return Err(ConfigError::InvalidDuration);
        }
        if timers.pre_alert_secs >= timers.duration_secs {
            return Err(ConfigError::InvalidPreAlert {
                pre_alert: timers.pre_alert_secs,
                duration: timers.duration_secs,
            });
        }

        let detection = &self.detection;
        if detection.sample_period_ms == 0 {
            return Err(ConfigError::InvalidSamplePeriod);
        }
        let threshold = detection.match_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold { threshold });
        }

        let mut keys = HashSet::with_capacity(detection.templates.len());
        for template in &detection.templates {
            if !keys.insert(template.key.as_str()) {
                return Err(ConfigError::DuplicateTemplate {
                    key: template.key.clone(),
                });
            }
            if !names.contains(template.boss.as_str()) {
                return Err(ConfigError::TemplateBossUnknown {
                    key: template.key.clone(),
                    boss: template.boss.clone(),
                });
            }
        }

        Ok(())
    }
}
