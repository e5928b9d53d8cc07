//! Tests for TimerRegistry
//!
//! Covers start/restart semantics, lockstep ticking and the next-boss aggregate.

use super::{TimerError, TimerRegistry, TimerState};

const DURATION: u32 = 1195;
const PRE_ALERT: u32 = 3;

fn registry(names: &[&str]) -> TimerRegistry {
    TimerRegistry::new(names.iter().copied(), DURATION, PRE_ALERT)
}

fn tick_n(registry: &mut TimerRegistry, n: u32) -> Vec<String> {
    let mut alerts = Vec::new();
    for _ in 0..n {
        alerts.extend(registry.tick_all().pre_alerts);
    }
    alerts
}

#[test]
fn test_start_activates_timer_and_sets_current() {
    let mut reg = registry(&["A", "B"]);
    assert!(reg.current_boss().is_none());
    assert!(reg.soonest_summary().is_none());

    reg.start("B").unwrap();

    let b = reg.get("B").unwrap();
    assert_eq!(b.remaining_secs(), DURATION);
    assert!(b.is_active());
    assert_eq!(reg.current_boss(), Some("B"));

    let summary = reg.soonest_summary().unwrap();
    assert_eq!(summary.name, "B");
    assert_eq!(summary.remaining, "19:55");
}

#[test]
fn test_unknown_boss_is_reported() {
    let mut reg = registry(&["A"]);
    assert_eq!(
        reg.start("Z"),
        Err(TimerError::UnknownBoss {
            name: "Z".to_string()
        })
    );
    assert!(reg.current_boss().is_none());
    assert!(reg.is_active("Z").is_err());
}

#[test]
fn test_last_trigger_wins_current_boss() {
    let mut reg = registry(&["A", "B"]);
    reg.start("A").unwrap();
    reg.start("B").unwrap();
    reg.start("A").unwrap();
    assert_eq!(reg.current_boss(), Some("A"));
}

#[test]
fn test_scenario_single_boss_full_countdown() {
    let mut reg = registry(&["A", "B"]);
    reg.start("A").unwrap();

    // t = 1..=1191: nothing fires
    assert!(tick_n(&mut reg, DURATION - PRE_ALERT - 1).is_empty());

    // t = 1192: remaining hits the threshold
    let report = reg.tick_all();
    assert_eq!(report.pre_alerts, vec!["A".to_string()]);
    assert_eq!(reg.get("A").unwrap().remaining_secs(), PRE_ALERT);

    // t = 1193..=1194
    assert!(tick_n(&mut reg, PRE_ALERT - 1).is_empty());
    assert!(reg.is_active("A").unwrap());

    // t = 1195: expiry
    let report = reg.tick_all();
    assert!(report.pre_alerts.is_empty());
    assert_eq!(report.expired, vec!["A".to_string()]);
    assert!(!reg.is_active("A").unwrap());
    assert!(reg.soonest_summary().is_none());

    // Expired is only visible for the tick it happened on
    assert_eq!(reg.get("A").unwrap().state(), TimerState::Expired);
    reg.tick_all();
    assert_eq!(reg.get("A").unwrap().state(), TimerState::Idle);
}

#[test]
fn test_pre_alert_fires_once_per_run() {
    let mut reg = registry(&["A"]);
    reg.start("A").unwrap();
    let alerts = tick_n(&mut reg, DURATION + 5);
    assert_eq!(alerts, vec!["A".to_string()]);
}

#[test]
fn test_restart_mid_countdown_rearms_pre_alert() {
    let mut reg = registry(&["A"]);
    reg.start("A").unwrap();
    assert_eq!(tick_n(&mut reg, DURATION - PRE_ALERT).len(), 1);

    reg.start("A").unwrap();
    assert_eq!(reg.get("A").unwrap().remaining_secs(), DURATION);
    assert!(!reg.get("A").unwrap().has_notified());

    // Fires again on the new run
    assert_eq!(tick_n(&mut reg, DURATION - PRE_ALERT).len(), 1);
}

#[test]
fn test_soonest_follows_smallest_remaining() {
    let mut reg = registry(&["A", "B"]);
    reg.start("A").unwrap();
    tick_n(&mut reg, 5);
    reg.start("B").unwrap();

    // A started earlier, so it stays soonest until it expires
    for _ in 0..(DURATION - 5 - 1) {
        reg.tick_all();
        assert_eq!(reg.soonest_summary().unwrap().name, "A");
    }

    // A expires, B takes over with 5 seconds left
    let report = reg.tick_all();
    assert_eq!(report.expired, vec!["A".to_string()]);
    let summary = reg.soonest_summary().unwrap();
    assert_eq!(summary.name, "B");
    assert_eq!(summary.remaining_secs, 5);
    assert_eq!(summary.remaining, "00:05");
}

#[test]
fn test_restarted_timer_drops_behind_others() {
    let mut reg = registry(&["A", "B"]);
    reg.start("A").unwrap();
    tick_n(&mut reg, 5);
    reg.start("B").unwrap();
    tick_n(&mut reg, 10);

    assert_eq!(reg.soonest_summary().unwrap().name, "A");
    reg.start("A").unwrap();
    assert_eq!(reg.soonest_summary().unwrap().name, "B");
}

#[test]
fn test_ties_break_by_roster_order() {
    let mut reg = registry(&["A", "B", "C"]);
    reg.start("C").unwrap();
    reg.start("B").unwrap();
    reg.tick_all();

    assert_eq!(reg.soonest_summary().unwrap().name, "B");
    assert_eq!(reg.active_timers().count(), 2);
}

#[test]
fn test_duplicate_roster_name_resolves_to_first() {
    let mut reg = registry(&["A", "A"]);
    reg.start("A").unwrap();
    assert!(reg.timers()[0].is_active());
    assert!(!reg.timers()[1].is_active());
}
