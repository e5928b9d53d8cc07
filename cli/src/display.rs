//! Terminal rendering of dispatcher updates
//!
//! Only changes are printed; the full board is shown by the `status` command.

use respawn_core::{DisplaySink, VisualState};

#[derive(Debug, Default)]
pub struct TerminalDisplay {
    current: String,
    next: String,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for TerminalDisplay {
    fn current_boss(&mut self, name: &str) {
        if !name.is_empty() {
            println!("\n>> {name} killed, respawn timer running");
        }
        self.current = name.to_string();
    }

    fn next_boss(&mut self, name: &str, remaining: &str) {
        if name != self.next {
            if !name.is_empty() {
                println!("\n>> next respawn: {name} in {remaining}");
            }
            self.next = name.to_string();
        }
    }

    fn timer_state(&mut self, name: &str, state: VisualState) {
        match state {
            VisualState::Neutral => {}
            VisualState::Active => tracing::debug!(boss = %name, "Display active"),
            VisualState::Complete => println!("\n>> {name} has respawned"),
        }
    }
}
