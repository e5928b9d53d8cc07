//! Notification queue and worker
//!
//! Runs in a background task, receiving payloads via an unbounded channel.
//! Delivery itself is blocking (speech engines, sound playback) and runs on
//! the blocking pool, awaited before the next payload is taken.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::error::DeliveryError;

/// Backend that turns a payload into something the player hears or sees.
///
/// `deliver` may block for as long as playback takes.
pub trait Delivery: Send + Sync + 'static {
    fn deliver(&self, text: &str) -> Result<(), DeliveryError>;
}

impl<F> Delivery for F
where
    F: Fn(&str) -> Result<(), DeliveryError> + Send + Sync + 'static,
{
    fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        self(text)
    }
}

/// Delivery that only writes to the log (speech disabled)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDelivery;

impl Delivery for LogDelivery {
    fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        tracing::info!(text = %text, "Notification");
        Ok(())
    }
}

enum SinkMessage {
    Deliver(String),
    /// Sentinel: stop after everything queued before it
    Shutdown,
}

/// Producer side of the notification queue.
///
/// `enqueue` never blocks and never drops. `shutdown` consumes the sink, so
/// nothing can be queued after it.
pub struct NotificationSink {
    tx: mpsc::UnboundedSender<SinkMessage>,
    worker: JoinHandle<()>,
}

impl NotificationSink {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn(delivery: impl Delivery) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(rx, Arc::new(delivery)));
        Self { tx, worker }
    }

    pub fn enqueue(&self, text: impl Into<String>) {
        let text = text.into();
        if self.tx.send(SinkMessage::Deliver(text)).is_err() {
            // Only reachable if the worker task itself died
            tracing::error!("Notification worker is gone, dropping alert");
        }
    }

    /// Queue the shutdown sentinel and wait for the worker to drain and exit
    pub async fn shutdown(self) {
        let _ = self.tx.send(SinkMessage::Shutdown);
        if let Err(e) = self.worker.await {
            tracing::error!(error = %e, "Notification worker terminated abnormally");
        }
    }
}

async fn run_worker(mut rx: mpsc::UnboundedReceiver<SinkMessage>, delivery: Arc<dyn Delivery>) {
    while let Some(message) = rx.recv().await {
        let text = match message {
            SinkMessage::Deliver(text) => text,
            SinkMessage::Shutdown => break,
        };

        let backend = Arc::clone(&delivery);
        let result = tokio::task::spawn_blocking(move || {
            let outcome = backend.deliver(&text);
            (text, outcome)
        })
        .await;

        match result {
            Ok((text, Ok(()))) => tracing::debug!(text = %text, "Notification delivered"),
            Ok((text, Err(e))) => {
                tracing::warn!(text = %text, error = %e, "Notification delivery failed, skipping");
            }
            Err(e) => tracing::error!(error = %e, "Notification delivery panicked, skipping"),
        }
    }
    tracing::debug!("Notification worker stopped");
}
