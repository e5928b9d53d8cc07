//! Dispatcher - owns timer state and drives the one-second tick
//!
//! Architecture:
//! - Dispatcher: sole owner of the `TimerRegistry`; runs as one background task
//! - DispatcherHandle: cloneable sender for triggers, snapshots and shutdown
//! - Detection events arrive on the same command queue as manual triggers,
//!   so timer state is only ever touched from the dispatcher task
mod display;
mod error;

#[cfg(test)]
mod dispatcher_tests;

pub use display::{DisplaySink, VisualState};
pub use error::DispatchError;

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::detection::DetectionEvent;
use crate::notifications::NotificationSink;
use crate::timers::{TickReport, TimerError, TimerRegistry, TimerState, TimerSummary};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

// ─────────────────────────────────────────────────────────────────────────────
// Commands & Snapshots
// ─────────────────────────────────────────────────────────────────────────────

/// Messages sent to the dispatcher task
pub enum DispatchCommand {
    Trigger {
        name: String,
        reply: oneshot::Sender<Result<(), TimerError>>,
    },
    Detected(DetectionEvent),
    Snapshot(oneshot::Sender<RegistrySnapshot>),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerStatus {
    pub name: String,
    pub state: TimerState,
    pub remaining_secs: u32,
    pub remaining: String,
}

/// Point-in-time copy of the registry, consistent within one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub current_boss: Option<String>,
    pub next: Option<TimerSummary>,
    pub timers: Vec<TimerStatus>,
}

impl RegistrySnapshot {
    pub fn timer(&self, name: &str) -> Option<&TimerStatus> {
        self.timers.iter().find(|t| t.name == name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handle
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DispatcherHandle {
    cmd_tx: mpsc::UnboundedSender<DispatchCommand>,
}

impl DispatcherHandle {
    /// Start (or restart) a boss's countdown, as if its button was pressed
    pub async fn trigger(&self, name: &str) -> Result<(), DispatchError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::Trigger {
            name: name.to_string(),
            reply,
        })?;
        rx.await.map_err(|_| DispatchError::Closed)?.map_err(DispatchError::from)
    }

    pub async fn snapshot(&self) -> Result<RegistrySnapshot, DispatchError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::Snapshot(reply))?;
        rx.await.map_err(|_| DispatchError::Closed)
    }

    pub fn detected(&self, event: DetectionEvent) -> Result<(), DispatchError> {
        self.send(DispatchCommand::Detected(event))
    }

    /// Feed a detection engine's events into the dispatcher queue
    pub fn forward_detections(
        &self,
        mut events: mpsc::UnboundedReceiver<DetectionEvent>,
    ) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if handle.detected(event).is_err() {
                    break;
                }
            }
        })
    }

    pub fn shutdown(&self) -> Result<(), DispatchError> {
        self.send(DispatchCommand::Shutdown)
    }

    fn send(&self, cmd: DispatchCommand) -> Result<(), DispatchError> {
        self.cmd_tx.send(cmd).map_err(|_| DispatchError::Closed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

pub struct Dispatcher<D: DisplaySink> {
    registry: TimerRegistry,
    notifications: NotificationSink,
    display: D,
    tick_period: Duration,
    cmd_rx: mpsc::UnboundedReceiver<DispatchCommand>,
}

impl<D: DisplaySink> Dispatcher<D> {
    /// Create a dispatcher and a handle to communicate with it.
    ///
    /// Publishes the initial (idle) display state immediately.
    pub fn new(
        registry: TimerRegistry,
        notifications: NotificationSink,
        display: D,
    ) -> (Self, DispatcherHandle) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let mut dispatcher = Self {
            registry,
            notifications,
            display,
            tick_period: TICK_PERIOD,
            cmd_rx,
        };
        dispatcher.publish_initial();

        (dispatcher, DispatcherHandle { cmd_tx })
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn registry(&self) -> &TimerRegistry {
        &self.registry
    }

    fn publish_initial(&mut self) {
        for timer in self.registry.timers() {
            self.display.timer_state(timer.name(), VisualState::Neutral);
        }
        self.display.current_boss("");
        self.display.next_boss("", "");
    }

    /// Manual trigger. Restarts unconditionally if already running.
    pub fn trigger(&mut self, name: &str) -> Result<(), TimerError> {
        self.registry.start(name)?;
        tracing::info!(boss = %name, "Timer started");

        self.display.timer_state(name, VisualState::Active);
        self.display.current_boss(name);
        self.publish_next();
        Ok(())
    }

    /// Detection event; same effect as a manual trigger
    pub fn on_detection(&mut self, event: &DetectionEvent) -> Result<(), TimerError> {
        self.trigger(&event.boss)
    }

    /// One-second step: tick all timers, republish, queue pre-alerts
    pub fn on_tick(&mut self) -> TickReport {
        let report = self.registry.tick_all();

        for name in &report.expired {
            tracing::info!(boss = %name, "Timer completed");
            self.display.timer_state(name, VisualState::Complete);
        }

        self.publish_next();

        for name in &report.pre_alerts {
            tracing::debug!(boss = %name, "Pre-alert queued");
            self.notifications.enqueue(name.clone());
        }

        report
    }

    fn publish_next(&mut self) {
        match self.registry.soonest_summary() {
            Some(next) => self.display.next_boss(&next.name, &next.remaining),
            None => self.display.next_boss("", ""),
        }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            current_boss: self.registry.current_boss().map(str::to_string),
            next: self.registry.soonest_summary(),
            timers: self
                .registry
                .timers()
                .iter()
                .map(|t| TimerStatus {
                    name: t.name().to_string(),
                    state: t.state(),
                    remaining_secs: t.remaining_secs(),
                    remaining: t.remaining_formatted(),
                })
                .collect(),
        }
    }

    /// Run the tick loop until shutdown, then flush pending notifications
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        tracing::info!(timers = self.registry.len(), "Dispatcher running");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.on_tick();
                }
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if !self.handle_command(cmd) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        self.shutdown().await;
    }

    /// Returns false when the loop should stop
    fn handle_command(&mut self, cmd: DispatchCommand) -> bool {
        match cmd {
            DispatchCommand::Trigger { name, reply } => {
                let result = self.trigger(&name);
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "Trigger rejected");
                }
                let _ = reply.send(result);
            }
            DispatchCommand::Detected(event) => {
                if let Err(e) = self.on_detection(&event) {
                    tracing::warn!(template = %event.template_key, error = %e, "Detection mapped to unknown boss");
                }
            }
            DispatchCommand::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            DispatchCommand::Shutdown => return false,
        }
        true
    }

    /// Stop accepting work and wait for queued notifications to finish
    pub async fn shutdown(self) {
        tracing::info!("Dispatcher stopping");
        self.notifications.shutdown().await;
    }
}
