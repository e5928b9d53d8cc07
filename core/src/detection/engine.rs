//! Background sampling loop
//!
//! Each `start_scan` spawns a loop with its own running flag; `stop_scan`
//! clears that flag. The loop checks it before every sample and before
//! emitting, so a stop takes effect within one sampling period and a loop
//! from an earlier scan can never outlive its flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use respawn_types::DetectionSettings;

use super::sampler::{Sampler, Scorer, Template};

/// A boss appeared on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionEvent {
    pub template_key: String,
    pub boss: String,
}

/// Periodic template matcher.
///
/// Only emits events; the receiver (the dispatcher) decides what they mean
/// for timer state. The runtime is captured at construction, so
/// `start_scan`/`stop_scan` may be called from any thread afterwards.
pub struct DetectionEngine<S: Scorer> {
    sampler: Arc<Mutex<Sampler<S>>>,
    period: Duration,
    events: mpsc::UnboundedSender<DetectionEvent>,
    runtime: Handle,
    /// Running flag of the current scan, if any
    scan: Mutex<Option<Arc<AtomicBool>>>,
}

impl<S: Scorer> DetectionEngine<S> {
    /// Create an engine and the receiving end of its event channel.
    ///
    /// Must be called from within a tokio runtime; sampling loops are spawned
    /// onto that runtime.
    pub fn new(
        scorer: S,
        templates: Vec<Template>,
        threshold: f32,
        period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<DetectionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let engine = Self {
            sampler: Arc::new(Mutex::new(Sampler::new(scorer, templates, threshold))),
            period,
            events,
            runtime: Handle::current(),
            scan: Mutex::new(None),
        };
        (engine, rx)
    }

    pub fn from_settings(
        scorer: S,
        settings: &DetectionSettings,
    ) -> (Self, mpsc::UnboundedReceiver<DetectionEvent>) {
        Self::new(
            scorer,
            settings.templates.iter().map(Template::from).collect(),
            settings.match_threshold,
            Duration::from_millis(settings.sample_period_ms),
        )
    }

    /// Start sampling. No-op if a scan is already running.
    pub fn start_scan(&self) {
        let mut scan = lock(&self.scan);
        if scan.as_ref().is_some_and(|running| running.load(Ordering::SeqCst)) {
            return;
        }

        let running = Arc::new(AtomicBool::new(true));
        self.runtime.spawn(scan_loop(
            Arc::clone(&self.sampler),
            Arc::clone(&running),
            self.period,
            self.events.clone(),
        ));
        *scan = Some(running);
    }

    /// Stop sampling. No-op if not scanning.
    pub fn stop_scan(&self) {
        if let Some(running) = lock(&self.scan).take() {
            running.store(false, Ordering::SeqCst);
        }
    }

    pub fn is_scanning(&self) -> bool {
        lock(&self.scan)
            .as_ref()
            .is_some_and(|running| running.load(Ordering::SeqCst))
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl<S: Scorer> Drop for DetectionEngine<S> {
    fn drop(&mut self) {
        self.stop_scan();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking scorer poisons the sampler; its state is still usable
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn scan_loop<S: Scorer>(
    sampler: Arc<Mutex<Sampler<S>>>,
    running: Arc<AtomicBool>,
    period: Duration,
    events: mpsc::UnboundedSender<DetectionEvent>,
) {
    tracing::info!(period_ms = period.as_millis() as u64, "Detection scan started");

    // A new scan is a new observation window
    let mut fresh = true;

    while running.load(Ordering::SeqCst) {
        let shared = Arc::clone(&sampler);
        let reset = std::mem::take(&mut fresh);
        let result = tokio::task::spawn_blocking(move || {
            let mut sampler = lock(&shared);
            if reset {
                sampler.reset();
            }
            sampler.sample()
        })
        .await;

        if !running.load(Ordering::SeqCst) {
            break;
        }

        match result {
            Ok(Ok(Some(event))) => {
                tracing::info!(boss = %event.boss, template = %event.template_key, "Boss detected");
                if events.send(event).is_err() {
                    tracing::debug!("Detection receiver dropped, stopping scan");
                    running.store(false, Ordering::SeqCst);
                    break;
                }
            }
            Ok(Ok(None)) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Detection sample failed, retrying"),
            Err(e) => tracing::error!(error = %e, "Detection sample panicked, retrying"),
        }

        tokio::time::sleep(period).await;
    }

    tracing::info!("Detection scan stopped");
}
