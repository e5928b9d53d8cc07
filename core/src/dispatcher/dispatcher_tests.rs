//! Tests for Dispatcher wiring
//!
//! Verifies that triggers, detections and ticks reach the registry, the
//! display and the notification queue.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::timeout;

use super::{Dispatcher, DispatchError, DisplaySink, VisualState};
use crate::detection::DetectionEvent;
use crate::notifications::{DeliveryError, NotificationSink};
use crate::timers::{TimerError, TimerRegistry, TimerState};

const DURATION: u32 = 1195;
const PRE_ALERT: u32 = 3;

#[derive(Debug, Default)]
struct Published {
    current: String,
    next: (String, String),
    states: Vec<(String, VisualState)>,
}

/// Display that records everything into shared state the test can inspect
#[derive(Clone, Default)]
struct RecordingDisplay(Arc<Mutex<Published>>);

impl RecordingDisplay {
    fn current(&self) -> String {
        self.0.lock().unwrap().current.clone()
    }

    fn next(&self) -> (String, String) {
        self.0.lock().unwrap().next.clone()
    }

    fn states_for(&self, name: &str) -> Vec<VisualState> {
        self.0
            .lock()
            .unwrap()
            .states
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, s)| *s)
            .collect()
    }
}

impl DisplaySink for RecordingDisplay {
    fn current_boss(&mut self, name: &str) {
        self.0.lock().unwrap().current = name.to_string();
    }

    fn next_boss(&mut self, name: &str, remaining: &str) {
        self.0.lock().unwrap().next = (name.to_string(), remaining.to_string());
    }

    fn timer_state(&mut self, name: &str, state: VisualState) {
        self.0.lock().unwrap().states.push((name.to_string(), state));
    }
}

fn recording_sink() -> (NotificationSink, Arc<Mutex<Vec<String>>>) {
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&delivered);
    let sink = NotificationSink::spawn(move |text: &str| -> Result<(), DeliveryError> {
        seen.lock().unwrap().push(text.to_string());
        Ok(())
    });
    (sink, delivered)
}

fn dispatcher(
    duration: u32,
) -> (
    Dispatcher<RecordingDisplay>,
    super::DispatcherHandle,
    RecordingDisplay,
    Arc<Mutex<Vec<String>>>,
) {
    let display = RecordingDisplay::default();
    let (sink, delivered) = recording_sink();
    let registry = TimerRegistry::new(["A", "B"], duration, PRE_ALERT);
    let (dispatcher, handle) = Dispatcher::new(registry, sink, display.clone());
    (dispatcher, handle, display, delivered)
}

#[tokio::test]
async fn test_initial_display_is_neutral_and_empty() {
    let (dispatcher, _handle, display, _) = dispatcher(DURATION);

    assert_eq!(display.states_for("A"), vec![VisualState::Neutral]);
    assert_eq!(display.states_for("B"), vec![VisualState::Neutral]);
    assert_eq!(display.current(), "");
    assert_eq!(display.next(), (String::new(), String::new()));

    dispatcher.shutdown().await;
}

#[tokio::test]
async fn test_trigger_publishes_current_and_active() {
    let (mut dispatcher, _handle, display, _) = dispatcher(DURATION);

    dispatcher.trigger("B").unwrap();
    assert_eq!(display.current(), "B");
    assert_eq!(display.states_for("B"), vec![VisualState::Neutral, VisualState::Active]);
    assert_eq!(display.next(), ("B".to_string(), "19:55".to_string()));

    let err = dispatcher.trigger("Nobody").unwrap_err();
    assert_eq!(err, TimerError::UnknownBoss { name: "Nobody".to_string() });
    assert_eq!(display.current(), "B");

    dispatcher.shutdown().await;
}

#[tokio::test]
async fn test_detection_restarts_running_timer() {
    let (mut dispatcher, _handle, display, _) = dispatcher(DURATION);

    dispatcher.trigger("A").unwrap();
    for _ in 0..100 {
        dispatcher.on_tick();
    }
    assert_eq!(dispatcher.registry().get("A").unwrap().remaining_secs(), DURATION - 100);

    let event = DetectionEvent {
        template_key: "a.png".to_string(),
        boss: "A".to_string(),
    };
    dispatcher.on_detection(&event).unwrap();

    assert_eq!(dispatcher.registry().get("A").unwrap().remaining_secs(), DURATION);
    assert_eq!(display.current(), "A");

    dispatcher.shutdown().await;
}

#[tokio::test]
async fn test_full_countdown_scenario() {
    let (mut dispatcher, _handle, display, delivered) = dispatcher(DURATION);

    dispatcher.trigger("A").unwrap();

    for t in 1..=DURATION {
        let report = dispatcher.on_tick();
        if t == DURATION - PRE_ALERT {
            assert_eq!(report.pre_alerts, vec!["A".to_string()], "pre-alert at t={t}");
        } else {
            assert!(report.pre_alerts.is_empty(), "unexpected pre-alert at t={t}");
        }
        if t == 1 {
            assert_eq!(display.next(), ("A".to_string(), "19:54".to_string()));
        }
    }

    assert!(!dispatcher.registry().is_active("A").unwrap());
    assert!(dispatcher.registry().soonest_summary().is_none());
    assert_eq!(display.next(), (String::new(), String::new()));
    assert_eq!(
        display.states_for("A"),
        vec![VisualState::Neutral, VisualState::Active, VisualState::Complete]
    );
    assert_eq!(display.states_for("B"), vec![VisualState::Neutral]);

    let snapshot = dispatcher.snapshot();
    assert_eq!(snapshot.timer("A").unwrap().state, TimerState::Expired);
    assert_eq!(snapshot.current_boss.as_deref(), Some("A"));

    dispatcher.shutdown().await;
    assert_eq!(*delivered.lock().unwrap(), vec!["A".to_string()]);
}

#[tokio::test]
async fn test_run_loop_ticks_and_answers_handle() {
    let (dispatcher, handle, display, delivered) = dispatcher(5);
    let task = tokio::spawn(dispatcher.with_tick_period(Duration::from_millis(10)).run());

    handle.trigger("A").await.unwrap();
    assert!(matches!(
        handle.trigger("Z").await,
        Err(DispatchError::Timer(TimerError::UnknownBoss { .. }))
    ));

    timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = handle.snapshot().await.unwrap();
            if snapshot.timer("A").unwrap().state != TimerState::Running {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    handle.shutdown().unwrap();
    task.await.unwrap();

    assert_eq!(*delivered.lock().unwrap(), vec!["A".to_string()]);
    assert!(display.states_for("A").contains(&VisualState::Complete));
    assert!(matches!(handle.snapshot().await, Err(DispatchError::Closed)));
}

#[tokio::test]
async fn test_forwarded_detections_start_timers() {
    let (dispatcher, handle, display, _) = dispatcher(DURATION);
    let task = tokio::spawn(dispatcher.run());

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let forwarder = handle.forward_detections(rx);
    tx.send(DetectionEvent {
        template_key: "b.png".to_string(),
        boss: "B".to_string(),
    })
    .unwrap();

    let snapshot = timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = handle.snapshot().await.unwrap();
            if snapshot.current_boss.is_some() {
                break snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(snapshot.current_boss.as_deref(), Some("B"));
    assert_eq!(display.current(), "B");

    drop(tx);
    forwarder.await.unwrap();
    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_broken_delivery_does_not_disturb_countdown() {
    let attempts = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&attempts);
    let sink = NotificationSink::spawn(move |text: &str| -> Result<(), DeliveryError> {
        let mut seen = seen.lock().unwrap();
        seen.push(text.to_string());
        if seen.len() % 2 == 1 {
            drop(seen);
            panic!("speaker unplugged");
        }
        Err(DeliveryError::Failed {
            reason: "speaker unplugged".to_string(),
        })
    });
    let display = RecordingDisplay::default();
    let registry = TimerRegistry::new(["A", "B"], 8, PRE_ALERT);
    let (mut dispatcher, _handle) = Dispatcher::new(registry, sink, display.clone());

    for round in 1..=2 {
        dispatcher.trigger("A").unwrap();
        for t in 1..=8u32 {
            let report = dispatcher.on_tick();
            let expected = usize::from(t == 8 - PRE_ALERT);
            assert_eq!(report.pre_alerts.len(), expected, "round {round} t={t}");
            let a = dispatcher.registry().get("A").unwrap();
            assert_eq!(a.remaining_secs(), 8 - t, "round {round} t={t}");
            // Let the worker fail on the queued alert while the timer keeps going
            tokio::task::yield_now().await;
        }
        assert_eq!(dispatcher.registry().get("A").unwrap().state(), TimerState::Expired);
        assert_eq!(display.states_for("A").last(), Some(&VisualState::Complete));
    }

    assert_eq!(
        display.states_for("A"),
        vec![
            VisualState::Neutral,
            VisualState::Active,
            VisualState::Complete,
            VisualState::Active,
            VisualState::Complete,
        ]
    );

    dispatcher.shutdown().await;
    assert_eq!(*attempts.lock().unwrap(), vec!["A".to_string(), "A".to_string()]);
}
