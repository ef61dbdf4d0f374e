//! Integration tests for the timer engine run loop.
//!
//! The engine is driven only through its command channel, the way the tray
//! and the console drive it, with tokio's clock paused so whole runs finish
//! instantly.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use cirrus::engine::{TimerCommand, TimerEngine, TimerEvent};
use cirrus::types::{TimerConfig, TimerPhase, TimerSnapshot};

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    commands: mpsc::UnboundedSender<TimerCommand>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    snapshots: watch::Receiver<TimerSnapshot>,
    handle: JoinHandle<TimerEngine>,
}

impl Harness {
    fn spawn(duration_minutes: f64) -> Self {
        let config = TimerConfig::new(duration_minutes).unwrap();
        let (event_tx, events) = mpsc::unbounded_channel();
        let (commands, command_rx) = mpsc::unbounded_channel();

        let mut engine = TimerEngine::new(config, event_tx).unwrap();
        let snapshots = engine.subscribe();
        let handle = tokio::spawn(async move {
            engine.run(command_rx).await;
            engine
        });

        Self {
            commands,
            events,
            snapshots,
            handle,
        }
    }

    fn send(&self, command: TimerCommand) {
        self.commands.send(command).unwrap();
    }

    fn snapshot(&self) -> TimerSnapshot {
        self.snapshots.borrow().clone()
    }

    fn drain(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    async fn shutdown(self) -> TimerEngine {
        self.commands.send(TimerCommand::Shutdown).unwrap();
        self.handle.await.unwrap()
    }
}

fn expired(events: &[TimerEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|e| match e {
            TimerEvent::Expired { initial_minutes } => Some(*initial_minutes),
            _ => None,
        })
        .collect()
}

/// Lets the engine apply queued commands without advancing the clock
/// past a tick.
async fn settle() {
    sleep(Duration::from_millis(10)).await;
}

// ============================================================================
// Full Runs
// ============================================================================

#[tokio::test(start_paused = true)]
async fn twenty_five_minute_run_expires_once() {
    let mut h = Harness::spawn(25.0);
    h.send(TimerCommand::Start);

    sleep(Duration::from_secs(1500) + Duration::from_millis(500)).await;

    let snapshot = h.snapshot();
    assert_eq!(snapshot.remaining_seconds, 0);
    assert_eq!(snapshot.phase, TimerPhase::Stopped);
    assert_eq!(snapshot.time_string(), "00:00");

    let events = h.drain();
    assert_eq!(expired(&events), vec![25]);

    // Nothing else happens once the run is over.
    sleep(Duration::from_secs(10)).await;
    assert!(expired(&h.drain()).is_empty());

    let engine = h.shutdown().await;
    assert!(!engine.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn one_minute_run_reports_one_minute() {
    let mut h = Harness::spawn(1.0);
    h.send(TimerCommand::Start);

    sleep(Duration::from_millis(60_500)).await;

    assert_eq!(expired(&h.drain()), vec![1]);
    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn fractional_duration_truncates() {
    let mut h = Harness::spawn(4.2);
    assert_eq!(h.snapshot().remaining_seconds, 240);

    h.send(TimerCommand::Start);
    sleep(Duration::from_millis(240_500)).await;

    assert_eq!(expired(&h.drain()), vec![4]);
    h.shutdown().await;
}

// ============================================================================
// Pause / Resume
// ============================================================================

#[tokio::test(start_paused = true)]
async fn pause_freezes_countdown() {
    let h = Harness::spawn(25.0);
    h.send(TimerCommand::Start);

    sleep(Duration::from_millis(10_500)).await;
    h.send(TimerCommand::Pause);
    settle().await;
    assert_eq!(h.snapshot().remaining_seconds, 1490);
    assert_eq!(h.snapshot().phase, TimerPhase::Paused);

    sleep(Duration::from_secs(120)).await;
    assert_eq!(h.snapshot().remaining_seconds, 1490);

    h.send(TimerCommand::Resume);
    sleep(Duration::from_millis(5_500)).await;
    assert_eq!(h.snapshot().remaining_seconds, 1485);
    assert_eq!(h.snapshot().phase, TimerPhase::Running);

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn pause_resume_cycles_still_expire_once() {
    let mut h = Harness::spawn(1.0);
    h.send(TimerCommand::Start);

    for _ in 0..3 {
        sleep(Duration::from_millis(10_500)).await;
        h.send(TimerCommand::Toggle);
        sleep(Duration::from_secs(30)).await;
        h.send(TimerCommand::Toggle);
    }
    sleep(Duration::from_secs(60)).await;

    let events = h.drain();
    assert_eq!(expired(&events), vec![1]);
    assert_eq!(h.snapshot().phase, TimerPhase::Stopped);
    h.shutdown().await;
}

// ============================================================================
// Presets and Duration Changes
// ============================================================================

#[tokio::test(start_paused = true)]
async fn preset_while_running_aborts_without_expiry() {
    let mut h = Harness::spawn(25.0);
    h.send(TimerCommand::Start);
    sleep(Duration::from_millis(3_500)).await;

    h.send(TimerCommand::SetPreset(10));
    settle().await;

    let snapshot = h.snapshot();
    assert_eq!(snapshot.phase, TimerPhase::Stopped);
    assert_eq!(snapshot.remaining_seconds, 600);

    sleep(Duration::from_secs(700)).await;
    assert_eq!(h.snapshot().remaining_seconds, 600);
    assert!(expired(&h.drain()).is_empty());

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn duration_change_applies_on_next_start() {
    let mut h = Harness::spawn(25.0);
    h.send(TimerCommand::Start);
    sleep(Duration::from_millis(2_500)).await;

    h.send(TimerCommand::SetDuration(1.0));
    settle().await;
    assert_eq!(h.snapshot().remaining_seconds, 1498);

    h.send(TimerCommand::Reset);
    settle().await;
    assert_eq!(h.snapshot().remaining_seconds, 60);

    h.send(TimerCommand::Start);
    sleep(Duration::from_millis(60_500)).await;
    assert_eq!(expired(&h.drain()), vec![1]);

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn invalid_preset_is_ignored() {
    let h = Harness::spawn(25.0);
    h.send(TimerCommand::SetPreset(0));
    settle().await;

    assert_eq!(h.snapshot().remaining_seconds, 1500);

    // The loop is still alive.
    h.send(TimerCommand::Start);
    settle().await;
    assert_eq!(h.snapshot().phase, TimerPhase::Running);
    h.shutdown().await;
}

// ============================================================================
// Restart
// ============================================================================

#[tokio::test(start_paused = true)]
async fn start_after_expiry_runs_again() {
    let mut h = Harness::spawn(1.0);
    h.send(TimerCommand::Start);
    sleep(Duration::from_millis(60_500)).await;

    h.send(TimerCommand::Start);
    settle().await;
    assert_eq!(h.snapshot().remaining_seconds, 60);
    assert_eq!(h.snapshot().phase, TimerPhase::Running);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(expired(&h.drain()), vec![1, 1]);
    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn loop_ends_when_all_senders_drop() {
    let Harness {
        commands, handle, ..
    } = Harness::spawn(1.0);
    drop(commands);

    let engine = handle.await.unwrap();
    assert_eq!(engine.phase(), TimerPhase::Stopped);
}
