//! Shared configuration types for the respawn tracker
//!
//! These are plain serde types so every front end (terminal, overlay, tests)
//! reads the same file format. Persistence and validation live in
//! `respawn-core`.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// 19 minutes 55 seconds: a 20 minute respawn minus 5 seconds of margin.
pub const DEFAULT_DURATION_SECS: u32 = 19 * 60 + 55;
pub const DEFAULT_PRE_ALERT_SECS: u32 = 3;
pub const DEFAULT_SAMPLE_PERIOD_MS: u64 = 500;
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.9;

/// Roster of the desktop build, in button order.
pub const DEFAULT_ROSTER: [&str; 24] = [
    "Naga",
    "Pixie",
    "Lancer",
    "Guardian",
    "Scarecrow",
    "Cockatrice",
    "Basilisk",
    "Siren",
    "Kuru",
    "Triton",
    "Orc",
    "Troll",
    "Ogre",
    "Kobold",
    "Caballo",
    "Flind",
    "Harpy",
    "Giant",
    "Minotaur",
    "Chabon",
    "Bug",
    "Leprechaun",
    "Skeleton",
    "Spider",
];

fn default_roster() -> Vec<String> {
    DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect()
}

fn default_duration_secs() -> u32 {
    DEFAULT_DURATION_SECS
}

fn default_pre_alert_secs() -> u32 {
    DEFAULT_PRE_ALERT_SECS
}

fn default_sample_period_ms() -> u64 {
    DEFAULT_SAMPLE_PERIOD_MS
}

fn default_match_threshold() -> f32 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_true() -> bool {
    true
}

fn default_speech_command() -> String {
    "espeak".to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Timer Settings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Countdown length applied on every start
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,

    /// Remaining seconds at which the pre-alert fires
    #[serde(default = "default_pre_alert_secs")]
    pub pre_alert_secs: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            pre_alert_secs: DEFAULT_PRE_ALERT_SECS,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection Settings
// ─────────────────────────────────────────────────────────────────────────────

/// A reference template and the boss it identifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub key: String,
    pub boss: String,
}

impl TemplateConfig {
    pub fn new(key: impl Into<String>, boss: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            boss: boss.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Start scanning as soon as the tracker launches
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_sample_period_ms")]
    pub sample_period_ms: u64,

    /// Minimum similarity (inclusive) for a template to count as a match
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,

    /// Checked in order; the first qualifying template wins a sample
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_period_ms: DEFAULT_SAMPLE_PERIOD_MS,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            templates: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notification Settings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Master toggle for spoken pre-alerts
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Text-to-speech program used on Linux; the alert text is passed as the
    /// last argument. Windows and macOS use the system speech engine.
    #[serde(default = "default_speech_command")]
    pub speech_command: String,

    #[serde(default)]
    pub speech_args: Vec<String>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            speech_command: default_speech_command(),
            speech_args: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the tracker reads at startup.
///
/// Note: Persistence methods (load/save) and validation are provided by
/// respawn-core via the `AppConfigExt` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Boss names in display order. Order breaks ties for "next boss".
    #[serde(default = "default_roster")]
    pub roster: Vec<String>,
    #[serde(default)]
    pub timers: TimerSettings,
    #[serde(default)]
    pub detection: DetectionSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            timers: TimerSettings::default(),
            detection: DetectionSettings::default(),
            notifications: NotificationSettings::default(),
        }
    }
}

impl AppConfig {
    /// Config with the given roster and default settings otherwise
    pub fn with_roster<I, S>(roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roster: roster.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Boss a detection template maps to, if configured
    pub fn boss_for_template(&self, key: &str) -> Option<&str> {
        self.detection
            .templates
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.boss.as_str())
    }
}
