use std::sync::Arc;

use respawn_core::context::AppConfig;
use respawn_core::{DetectionEngine, Dispatcher, DispatcherHandle, TimerRegistry};
use tokio::task::JoinHandle;

use crate::display::TerminalDisplay;
use crate::scorer::InjectedScorer;
use crate::speech;

#[derive(Default)]
pub struct BackgroundTasks {
    pub dispatcher: Option<JoinHandle<()>>,
    pub detections: Option<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Wait for the dispatcher to flush and exit, then drop the forwarder
    pub async fn join_all(&mut self) {
        if let Some(handle) = self.dispatcher.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Dispatcher task failed");
            }
        }
        if let Some(handle) = self.detections.take() {
            handle.abort();
        }
    }
}

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in respawn-core.
pub struct CliContext {
    pub config: AppConfig,
    pub dispatcher: DispatcherHandle,
    pub detection: Arc<DetectionEngine<InjectedScorer>>,
    pub scorer: InjectedScorer,
    pub tasks: BackgroundTasks,
}

impl CliContext {
    /// Wire up and spawn the tracker. Must be called inside the tokio runtime.
    pub fn start(config: AppConfig, speak: bool) -> Self {
        let notifications = speech::spawn_sink(&config.notifications, speak);

        let registry = TimerRegistry::from_config(&config);
        let (dispatcher, handle) = Dispatcher::new(registry, notifications, TerminalDisplay::new());

        let scorer = InjectedScorer::new();
        let (engine, events) = DetectionEngine::from_settings(scorer.clone(), &config.detection);

        let tasks = BackgroundTasks {
            dispatcher: Some(tokio::spawn(dispatcher.run())),
            detections: Some(handle.forward_detections(events)),
        };

        Self {
            config,
            dispatcher: handle,
            detection: Arc::new(engine),
            scorer,
            tasks,
        }
    }

    /// Roster entry matching `name` case-insensitively, or `name` unchanged
    pub fn resolve_boss<'a>(&'a self, name: &'a str) -> &'a str {
        self.config
            .roster
            .iter()
            .find(|b| b.eq_ignore_ascii_case(name))
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// Stop scanning, stop ticking, flush pending notifications
    pub async fn shutdown(mut self) {
        self.detection.stop_scan();
        if self.dispatcher.shutdown().is_err() {
            tracing::debug!("Dispatcher already stopped");
        }
        self.tasks.join_all().await;
    }
}
