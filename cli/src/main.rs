use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use respawn_cli::CliContext;
use respawn_cli::commands;
use respawn_cli::logging;
use respawn_cli::readline;
use respawn_core::context::{AppConfig, AppConfigExt};

/// Boss respawn tracker
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Load configuration from this file instead of the platform config dir
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log pre-alerts instead of speaking them
    #[arg(long)]
    no_speech: bool,

    /// Start detection scanning at launch
    #[arg(long)]
    scan: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load(),
    };
    config.validate().context("invalid configuration")?;

    let ctx = CliContext::start(config, !args.no_speech);
    if args.scan || ctx.config.detection.enabled {
        ctx.detection.start_scan();
    }

    println!(
        "tracking {} bosses, type `help` for commands",
        ctx.config.roster.len()
    );

    loop {
        let line = match readline() {
            Ok(line) => line,
            Err(err) => {
                tracing::error!(error = %err, "Failed to read input");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}")?;
                std::io::stdout().flush()?;
            }
        }
    }

    ctx.shutdown().await;
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "respawn shell")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScanAction {
    Start,
    Stop,
}

#[derive(Subcommand)]
enum Commands {
    /// Start (or restart) a boss's respawn countdown
    Trigger { name: String },
    /// Show current and next boss plus all running countdowns
    Status,
    /// List the roster
    List,
    /// Control automated detection
    Scan { action: ScanAction },
    /// Set the score a detection template gets on every frame
    Observe { template: String, score: f32 },
    /// Reset all injected template scores
    ClearObservations,
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "respawn".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Trigger { name }) => commands::trigger(name, ctx).await,
        Some(Commands::Status) => commands::show_status(ctx).await,
        Some(Commands::List) => commands::list_bosses(ctx),
        Some(Commands::Scan { action }) => {
            commands::scan(matches!(action, ScanAction::Start), ctx)
        }
        Some(Commands::Observe { template, score }) => commands::observe(template, *score, ctx),
        Some(Commands::ClearObservations) => commands::clear_observations(ctx),
        Some(Commands::Config) => commands::show_settings(ctx),
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
