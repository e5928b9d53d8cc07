//! Timer registry
//!
//! Owns one `CountdownTimer` per roster entry, advances them in lockstep and
//! answers "who was just triggered" and "who respawns next".

use std::panic::{self, AssertUnwindSafe};

use hashbrown::HashMap;

use super::countdown::{CountdownTimer, TimerState};
use super::error::TimerError;

/// Soonest-expiring running timer, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSummary {
    pub name: String,
    pub remaining_secs: u32,
    pub remaining: String,
}

/// Signals collected from one `tick_all` pass, in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Bosses whose countdown just reached the pre-alert threshold
    pub pre_alerts: Vec<String>,
    /// Bosses whose countdown just reached zero
    pub expired: Vec<String>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.pre_alerts.is_empty() && self.expired.is_empty()
    }
}

/// Fixed set of boss countdowns.
///
/// Built once from the roster; never resized.
#[derive(Debug)]
pub struct TimerRegistry {
    timers: Vec<CountdownTimer>,
    index: HashMap<String, usize>,
    current_boss: Option<String>,
    soonest: Option<usize>,
}

impl TimerRegistry {
    /// Build a registry from an ordered roster.
    ///
    /// Names are expected to be unique (see `context::validate`); a repeated
    /// name resolves to its first declaration.
    pub fn new<I, S>(roster: I, duration_secs: u32, pre_alert_secs: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let timers: Vec<CountdownTimer> = roster
            .into_iter()
            .map(|name| CountdownTimer::new(name, duration_secs, pre_alert_secs))
            .collect();

        let mut index = HashMap::with_capacity(timers.len());
        for (i, timer) in timers.iter().enumerate() {
            index.entry(timer.name().to_string()).or_insert(i);
        }

        Self {
            timers,
            index,
            current_boss: None,
            soonest: None,
        }
    }

    pub fn from_config(config: &respawn_types::AppConfig) -> Self {
        Self::new(
            config.roster.iter().cloned(),
            config.timers.duration_secs,
            config.timers.pre_alert_secs,
        )
    }

    /// Start (or restart) the named boss's countdown.
    ///
    /// The boss becomes the current boss; no history is kept.
    pub fn start(&mut self, name: &str) -> Result<(), TimerError> {
        let &i = self.index.get(name).ok_or_else(|| TimerError::UnknownBoss {
            name: name.to_string(),
        })?;

        let timer = &mut self.timers[i];
        if timer.is_active() {
            tracing::debug!(boss = %name, remaining = timer.remaining_secs(), "Restarting running timer");
        }
        timer.start();
        self.current_boss = Some(timer.name().to_string());
        self.recompute_soonest();
        Ok(())
    }

    /// Tick every timer in roster order, then recompute the aggregate.
    ///
    /// A panic inside one timer's tick is logged and does not stop the rest.
    pub fn tick_all(&mut self) -> TickReport {
        let mut report = TickReport::default();

        for timer in &mut self.timers {
            match panic::catch_unwind(AssertUnwindSafe(|| timer.tick())) {
                Ok(outcome) => {
                    if outcome.pre_alert {
                        report.pre_alerts.push(timer.name().to_string());
                    }
                    if outcome.expired {
                        report.expired.push(timer.name().to_string());
                    }
                }
                Err(_) => {
                    tracing::error!(boss = %timer.name(), "Timer tick panicked, skipping");
                }
            }
        }

        self.recompute_soonest();
        report
    }

    fn recompute_soonest(&mut self) {
        // min_by_key keeps the first of equal minima, so roster order breaks ties
        self.soonest = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_active())
            .min_by_key(|(_, t)| t.remaining_secs())
            .map(|(i, _)| i);
    }

    /// Earliest-expiring running timer, or `None` when nothing runs
    pub fn soonest_summary(&self) -> Option<TimerSummary> {
        self.soonest.map(|i| {
            let timer = &self.timers[i];
            TimerSummary {
                name: timer.name().to_string(),
                remaining_secs: timer.remaining_secs(),
                remaining: timer.remaining_formatted(),
            }
        })
    }

    pub fn current_boss(&self) -> Option<&str> {
        self.current_boss.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&CountdownTimer> {
        self.index.get(name).map(|&i| &self.timers[i])
    }

    pub fn is_active(&self, name: &str) -> Result<bool, TimerError> {
        self.get(name)
            .map(CountdownTimer::is_active)
            .ok_or_else(|| TimerError::UnknownBoss {
                name: name.to_string(),
            })
    }

    /// Timers in roster order
    pub fn timers(&self) -> &[CountdownTimer] {
        &self.timers
    }

    /// Running timers in roster order
    pub fn active_timers(&self) -> impl Iterator<Item = &CountdownTimer> {
        self.timers.iter().filter(|t| t.state() == TimerState::Running)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
