//! Boss respawn timers
//!
//! This module provides:
//! - **Countdowns**: one state machine per boss (`CountdownTimer`)
//! - **Registry**: the fixed roster of countdowns, ticked in lockstep
//!
//! All timer state is owned by a single flow of control (the dispatcher's
//! tick loop), so nothing here is synchronized.

mod countdown;
mod error;
mod registry;

#[cfg(test)]
mod registry_tests;

pub use countdown::{CountdownTimer, TickOutcome, TimerState, format_mm_ss};
pub use error::TimerError;
pub use registry::{TickReport, TimerRegistry, TimerSummary};
