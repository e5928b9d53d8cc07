mod config;
mod error;

pub use config::{
    AppConfig, AppConfigExt, DEFAULT_DURATION_SECS, DEFAULT_MATCH_THRESHOLD,
    DEFAULT_PRE_ALERT_SECS, DEFAULT_ROSTER, DEFAULT_SAMPLE_PERIOD_MS, DetectionSettings,
    NotificationSettings, TemplateConfig, TimerSettings,
};
pub use error::ConfigError;
