//! Per-boss countdown state machine
//!
//! A `CountdownTimer` is created once per roster entry and lives for the whole
//! process. Starting it (again) re-initializes the countdown; nothing removes it.
//!
//! # Lifecycle
//!
//! 1. `Idle`: nothing running, remaining is 0
//! 2. `start()` → `Running` with the full duration
//! 3. Each `tick()` subtracts one second; the pre-alert fires once on the way down
//! 4. Reaching 0 → `Expired` for exactly one tick, then back to `Idle`

/// Countdown lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    /// Reached zero on the most recent tick
    Expired,
}

/// Signals produced by a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Remaining time just reached the pre-alert threshold
    pub pre_alert: bool,
    /// Remaining time just reached zero
    pub expired: bool,
}

impl TickOutcome {
    pub fn is_empty(&self) -> bool {
        !self.pre_alert && !self.expired
    }
}

/// One boss's countdown
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    name: String,
    remaining: u32,
    state: TimerState,
    notified_at_threshold: bool,

    // ─── Settings (fixed at construction) ───────────────────────────────────
    duration: u32,
    pre_alert: u32,
}

impl CountdownTimer {
    pub fn new(name: impl Into<String>, duration_secs: u32, pre_alert_secs: u32) -> Self {
        Self {
            name: name.into(),
            remaining: 0,
            state: TimerState::Idle,
            notified_at_threshold: false,
            duration: duration_secs,
            pre_alert: pre_alert_secs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Whether the pre-alert has already fired for the current run
    pub fn has_notified(&self) -> bool {
        self.notified_at_threshold
    }

    /// (Re)start the countdown from the full duration.
    ///
    /// Always succeeds. A running countdown is overwritten, not rejected.
    pub fn start(&mut self) {
        self.remaining = self.duration;
        self.state = TimerState::Running;
        self.notified_at_threshold = false;
    }

    /// Advance by one second
    pub fn tick(&mut self) -> TickOutcome {
        match self.state {
            TimerState::Idle => TickOutcome::default(),
            TimerState::Expired => {
                self.state = TimerState::Idle;
                TickOutcome::default()
            }
            TimerState::Running => {
                self.remaining = self.remaining.saturating_sub(1);

                let mut outcome = TickOutcome::default();
                if self.remaining == self.pre_alert && !self.notified_at_threshold {
                    self.notified_at_threshold = true;
                    outcome.pre_alert = true;
                }
                if self.remaining == 0 {
                    self.state = TimerState::Expired;
                    outcome.expired = true;
                }
                outcome
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Remaining time as `MM:SS`
    pub fn remaining_formatted(&self) -> String {
        format_mm_ss(self.remaining)
    }
}

/// Format whole seconds as zero-padded `MM:SS`
pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: u32 = 1195;
    const PRE_ALERT: u32 = 3;

    fn timer() -> CountdownTimer {
        CountdownTimer::new("Naga", DURATION, PRE_ALERT)
    }

    #[test]
    fn new_timer_is_idle() {
        let t = timer();
        assert_eq!(t.state(), TimerState::Idle);
        assert_eq!(t.remaining_secs(), 0);
        assert!(!t.is_active());
        assert_eq!(t.remaining_formatted(), "00:00");
    }

    #[test]
    fn idle_tick_is_noop() {
        let mut t = timer();
        assert!(t.tick().is_empty());
        assert_eq!(t.remaining_secs(), 0);
        assert_eq!(t.state(), TimerState::Idle);
    }

    #[test]
    fn start_sets_full_duration() {
        let mut t = timer();
        t.start();
        assert_eq!(t.remaining_secs(), DURATION);
        assert!(t.is_active());
        assert_eq!(t.remaining_formatted(), "19:55");
    }

    #[test]
    fn full_run_expires_and_alerts_once() {
        let mut t = timer();
        t.start();

        let mut alerts_at = Vec::new();
        let mut expired_at = Vec::new();
        for i in 1..=DURATION {
            let outcome = t.tick();
            if outcome.pre_alert {
                alerts_at.push((i, t.remaining_secs()));
            }
            if outcome.expired {
                expired_at.push(i);
            }
        }

        assert_eq!(alerts_at, vec![(DURATION - PRE_ALERT, PRE_ALERT)]);
        assert_eq!(expired_at, vec![DURATION]);
        assert_eq!(t.remaining_secs(), 0);
        assert!(!t.is_active());
        assert_eq!(t.state(), TimerState::Expired);
    }

    #[test]
    fn expired_is_observable_for_one_tick() {
        let mut t = CountdownTimer::new("Orc", 2, 1);
        t.start();
        t.tick();
        assert!(t.tick().expired);
        assert_eq!(t.state(), TimerState::Expired);

        assert!(t.tick().is_empty());
        assert_eq!(t.state(), TimerState::Idle);
    }

    #[test]
    fn restart_mid_countdown_resets_everything() {
        let mut t = timer();
        t.start();
        for _ in 0..(DURATION - PRE_ALERT) {
            t.tick();
        }
        assert!(t.has_notified());

        t.start();
        assert_eq!(t.remaining_secs(), DURATION);
        assert!(!t.has_notified());
        assert!(t.is_active());
    }

    #[test]
    fn zero_threshold_alerts_on_expiry_tick() {
        let mut t = CountdownTimer::new("Troll", 2, 0);
        t.start();
        assert!(t.tick().is_empty());
        let last = t.tick();
        assert!(last.pre_alert);
        assert!(last.expired);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(59), "00:59");
        assert_eq!(format_mm_ss(60), "01:00");
        assert_eq!(format_mm_ss(1192), "19:52");
    }
}
