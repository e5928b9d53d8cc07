use std::io::Write;

use respawn_core::context::{AppConfig, AppConfigExt};
use respawn_core::{DispatchError, TimerState};

use crate::CliContext;

pub async fn trigger(name: &str, ctx: &CliContext) {
    let boss = ctx.resolve_boss(name);
    match ctx.dispatcher.trigger(boss).await {
        Ok(()) => {}
        Err(DispatchError::Timer(e)) => println!("{e} (see `list`)"),
        Err(e) => println!("error: {e}"),
    }
}

pub async fn show_status(ctx: &CliContext) {
    let snapshot = match ctx.dispatcher.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            println!("error: {e}");
            return;
        }
    };

    println!("Current: {}", snapshot.current_boss.as_deref().unwrap_or("-"));
    match &snapshot.next {
        Some(next) => println!("Next:    {} in {}", next.name, next.remaining),
        None => println!("Next:    -"),
    }

    let running: Vec<_> = snapshot
        .timers
        .iter()
        .filter(|t| t.state == TimerState::Running)
        .collect();
    if running.is_empty() {
        return;
    }

    println!();
    println!("{:<20} Remaining", "Boss");
    println!("{}", "-".repeat(30));
    for timer in running {
        println!("{:<20} {}", timer.name, timer.remaining);
    }
}

pub fn list_bosses(ctx: &CliContext) {
    for (i, name) in ctx.config.roster.iter().enumerate() {
        println!("{:>2}. {}", i + 1, name);
    }
}

pub fn scan(start: bool, ctx: &CliContext) {
    if ctx.config.detection.templates.is_empty() {
        println!("warning: no detection templates configured");
    }
    if start {
        ctx.detection.start_scan();
        println!("scanning every {}ms", ctx.detection.period().as_millis());
    } else {
        ctx.detection.stop_scan();
        println!("scanning stopped");
    }
}

pub fn observe(template: &str, score: f32, ctx: &CliContext) {
    match ctx.config.boss_for_template(template) {
        Some(boss) => {
            let stored = ctx.scorer.set(template, score);
            println!("{template} ({boss}) now scores {stored:.2}");
        }
        None => println!("unknown template '{template}'"),
    }
}

pub fn clear_observations(ctx: &CliContext) {
    ctx.scorer.clear();
    println!("all template scores reset");
}

pub fn show_settings(ctx: &CliContext) {
    match AppConfig::config_path() {
        Ok(path) => println!("Config file:    {}", path.display()),
        Err(e) => println!("Config file:    unavailable ({e})"),
    }
    let config = &ctx.config;
    println!("Bosses:         {}", config.roster.len());
    println!(
        "Timer:          {}s, pre-alert at {}s",
        config.timers.duration_secs, config.timers.pre_alert_secs
    );
    println!(
        "Detection:      {} templates, every {}ms, threshold {:.2}, {}",
        config.detection.templates.len(),
        config.detection.sample_period_ms,
        config.detection.match_threshold,
        if ctx.detection.is_scanning() { "scanning" } else { "idle" }
    );
    for (key, score) in ctx.scorer.current() {
        println!("  {key}: {score:.2}");
    }
    println!(
        "Notifications:  {} ({})",
        if config.notifications.enabled { "on" } else { "off" },
        config.notifications.speech_command
    );
}

pub fn exit() {
    let _ = write!(std::io::stdout(), "quitting...");
    let _ = std::io::stdout().flush();
}
