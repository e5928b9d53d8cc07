//! Display sink - the consumer side of the dispatcher
//!
//! Front ends implement this to render the tracker. The display is never a
//! source of timer truth; it only receives what the dispatcher publishes.

/// Per-boss visual cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    /// Never started since launch
    Neutral,
    /// Counting down
    Active,
    /// Reached zero; kept until the next start
    Complete,
}

pub trait DisplaySink: Send + 'static {
    /// Boss that was triggered most recently ("" at startup)
    fn current_boss(&mut self, name: &str);

    /// Soonest-expiring running timer; both strings are empty when none runs
    fn next_boss(&mut self, name: &str, remaining: &str);

    fn timer_state(&mut self, name: &str, state: VisualState);
}
