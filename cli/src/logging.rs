//! Tracing setup for the shell
//!
//! Events go to `<config dir>/respawn/respawn.log`, rolled over at 10 MB, and
//! warnings also go to the terminal. `DEBUG_LOGGING` turns on debug events
//! from the respawn crates in both places.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVE: &str = "info,respawn_core=debug,respawn_cli=debug,respawn=debug";

/// Install the global subscriber.
///
/// The file writer is non-blocking; keep the returned guard alive until exit
/// or the tail of the log is lost. `None` means the log file could not be
/// opened and only the terminal layer is installed.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let log_dir = match dirs::config_dir() {
        Some(config) => config.join("respawn"),
        None => {
            init_stdout_only(debug_logging);
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("cannot create {}: {e}; logging to terminal only", log_dir.display());
        init_stdout_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join("respawn.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("cannot open {}: {e}; logging to terminal only", log_path.display());
            init_stdout_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(file_filter(debug_logging));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(terminal_layer(debug_logging))
        .init();

    tracing::info!(
        log_file = ?log_path,
        debug_logging,
        "File logging ready"
    );

    Some(guard)
}

fn file_filter(debug_logging: bool) -> EnvFilter {
    EnvFilter::new(if debug_logging { DEBUG_DIRECTIVE } else { "info" })
}

fn stdout_filter(debug_logging: bool) -> EnvFilter {
    EnvFilter::new(if debug_logging { DEBUG_DIRECTIVE } else { "warn" })
}

fn terminal_layer<S>(debug_logging: bool) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(stdout_filter(debug_logging))
}

fn init_stdout_only(debug_logging: bool) {
    tracing_subscriber::registry()
        .with(terminal_layer(debug_logging))
        .init();

    tracing::debug!(debug_logging, "Terminal logging ready");
}
