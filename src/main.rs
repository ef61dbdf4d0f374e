//! Cirrus - a menu bar countdown timer
//!
//! Shows the remaining time as `MM:SS` in the status bar, can be driven from
//! the tray menu or from stdin, and raises a desktop alert when the countdown
//! reaches zero.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tokio::sync::{mpsc, watch};

use cirrus::cli::{Cli, Commands, Console, Display};
use cirrus::engine::{TimerCommand, TimerEngine};
use cirrus::menubar::{TrayIconManager, TrayUpdate};
use cirrus::notification::{init_platform_notifier, NotificationDispatcher};
use cirrus::types::TimerSnapshot;

/// How often the tray is polled for clicks and refreshed.
const TRAY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    // The blocking stdin read cannot be cancelled; do not wait for it.
    std::process::exit(0);
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => run_timer(&cli).await,
    }
}

/// Runs the timer until quit, tray Quit or Ctrl-C.
async fn run_timer(cli: &Cli) -> Result<()> {
    let config = cli.timer_config();

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let mut engine =
        TimerEngine::new(config.clone(), event_tx).context("invalid timer configuration")?;
    let initial = engine.snapshot();

    let notifier = init_platform_notifier(cli.notification_delay()).await;
    if notifier.is_none() {
        Display::show_notifications_disabled();
    }
    let dispatcher = NotificationDispatcher::new(notifier);

    let (tray_tx, tray_rx) = crossbeam_channel::unbounded();
    let mut tray = TrayIconManager::new(initial.clone(), config.presets.clone(), tray_rx);
    tray.initialize().context("failed to initialize menu bar")?;

    Display::show_banner(&initial);

    let presenter = tokio::spawn(present(
        initial.clone(),
        engine.subscribe(),
        tray_tx.clone(),
    ));

    let mut console = Console::new(command_tx.clone(), engine.subscribe());
    let console_task = tokio::spawn(async move {
        if let Err(e) = console.run(BufReader::new(tokio::io::stdin())).await {
            tracing::warn!(error = %e, "failed to read console input");
        }
    });

    if cli.start {
        command_tx
            .send(TimerCommand::Start)
            .context("timer engine is not running")?;
    }

    tokio::select! {
        _ = engine.run(command_rx) => {
            tracing::info!("timer engine stopped");
        }
        _ = dispatcher.run(event_rx) => {
            tracing::warn!("notification dispatcher stopped");
        }
        _ = drive_tray(&mut tray, &command_tx) => {
            tracing::warn!("menu bar stopped");
        }
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for Ctrl-C")?;
            tracing::info!("interrupted");
        }
    }

    presenter.abort();
    console_task.abort();
    if tray_tx.send(TrayUpdate::Shutdown).is_ok() {
        tray.process_pending_updates();
    }
    tray.shutdown();

    Ok(())
}

/// Forwards snapshots to the tray and echoes transitions on the console.
///
/// `previous` is the state the tray was built from; changes published before
/// the task first runs are still reported against it.
async fn present(
    mut previous: TimerSnapshot,
    mut snapshots: watch::Receiver<TimerSnapshot>,
    tray: crossbeam_channel::Sender<TrayUpdate>,
) {
    while snapshots.changed().await.is_ok() {
        let current = snapshots.borrow_and_update().clone();
        Display::show_transition(&previous, &current);

        if tray.send(TrayUpdate::Refresh(current.clone())).is_err() {
            break;
        }
        previous = current;
    }
}

/// Polls the tray for updates and clicks.
///
/// Returns only when the engine's command channel is closed.
async fn drive_tray(tray: &mut TrayIconManager, commands: &mpsc::UnboundedSender<TimerCommand>) {
    let mut interval = tokio::time::interval(TRAY_POLL_INTERVAL);

    loop {
        interval.tick().await;
        tray.pump_native_events();
        tray.process_pending_updates();

        while let Some(action) = tray.poll_menu_action() {
            if commands.send(action.to_command()).is_err() {
                return;
            }
        }
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
