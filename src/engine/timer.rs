//! Timer engine for the countdown timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Stopped → Running ⇄ Paused → Stopped)
//! - Countdown driven by an owned, cancellable [`Ticker`]
//! - Observable snapshots over a `watch` channel
//! - Event firing for notifications and presentation layers

use tokio::sync::{mpsc, watch};

use super::ticker::{Tick, Ticker, TICK_PERIOD};
use crate::types::{
    validate_duration, ConfigError, TickOutcome, TimerConfig, TimerPhase, TimerSnapshot,
    TimerState,
};

// ============================================================================
// TimerCommand
// ============================================================================

/// Commands accepted by [`TimerEngine::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerCommand {
    /// Start a run from the stopped state
    Start,
    /// Pause a running timer
    Pause,
    /// Resume a paused timer
    Resume,
    /// Stop and re-arm the configured duration
    Reset,
    /// Start, pause or resume depending on the current phase
    Toggle,
    /// Apply a whole-minute preset, aborting any run
    SetPreset(u32),
    /// Change the configured duration
    SetDuration(f64),
    /// Leave the run loop
    Shutdown,
}

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for notifications and external integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A run started
    Started {
        /// Whole minutes the run started with
        initial_minutes: u32,
    },
    /// Timer paused
    Paused {
        /// Remaining seconds at the moment of pausing
        remaining_seconds: u32,
    },
    /// Timer resumed
    Resumed {
        /// Remaining seconds at the moment of resuming
        remaining_seconds: u32,
    },
    /// Timer stopped and re-armed
    Reset,
    /// A preset was applied
    PresetApplied {
        /// Preset duration in minutes
        minutes: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// The countdown reached zero
    Expired {
        /// Whole minutes the finished run was started with
        initial_minutes: u32,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Sole owner of the countdown state and its tick registration.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Live tick registration
    ticker: Ticker,
    /// Ticks produced by `ticker`
    tick_rx: mpsc::UnboundedReceiver<Tick>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Observable state
    snapshot_tx: watch::Sender<TimerSnapshot>,
}

impl TimerEngine {
    /// Creates a stopped engine armed with the configured duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the duration or a preset fails validation.
    pub fn new(
        config: TimerConfig,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = TimerState::new(config.duration_minutes);
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(state.snapshot());

        Ok(Self {
            state,
            ticker: Ticker::new(TICK_PERIOD, tick_tx),
            tick_rx,
            event_tx,
            snapshot_tx,
        })
    }

    /// Runs the command/tick loop until `Shutdown` or all command senders
    /// are dropped.
    ///
    /// Commands and ticks are applied one at a time, in arrival order.
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<TimerCommand>) {
        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(TimerCommand::Shutdown) | None => break,
                    Some(command) => {
                        if let Err(e) = self.apply(command) {
                            tracing::warn!(error = %e, ?command, "command rejected");
                        }
                    }
                },
                Some(tick) = self.tick_rx.recv() => self.handle_tick(tick),
            }
        }

        self.ticker.cancel();
        tracing::info!("timer engine stopped");
    }

    /// Applies a single command.
    ///
    /// # Errors
    ///
    /// Returns an error if a preset or duration fails validation.
    pub fn apply(&mut self, command: TimerCommand) -> Result<(), ConfigError> {
        match command {
            TimerCommand::Start => {
                self.start();
            }
            TimerCommand::Pause => {
                self.pause();
            }
            TimerCommand::Resume => {
                self.resume();
            }
            TimerCommand::Reset => self.reset(),
            TimerCommand::Toggle => self.toggle(),
            TimerCommand::SetPreset(minutes) => self.set_preset(minutes)?,
            TimerCommand::SetDuration(minutes) => self.set_duration(minutes)?,
            TimerCommand::Shutdown => self.ticker.cancel(),
        }
        Ok(())
    }

    /// Starts a run. Returns false (no-op) unless the timer is stopped.
    ///
    /// Outside a tokio runtime no run can be counted, so the timer stays
    /// stopped and false is returned.
    pub fn start(&mut self) -> bool {
        if !Ticker::can_arm() {
            tracing::warn!("start ignored: no tokio runtime");
            return false;
        }
        if !self.state.start() {
            tracing::debug!(phase = %self.state.phase, "start ignored");
            return false;
        }

        self.ticker.arm();

        let initial_minutes = self.state.initial_minutes();
        tracing::info!(initial_minutes, "timer started");
        self.emit(TimerEvent::Started { initial_minutes });
        self.publish();
        true
    }

    /// Pauses a running timer. Returns false (no-op) otherwise.
    pub fn pause(&mut self) -> bool {
        if !self.state.pause() {
            tracing::debug!(phase = %self.state.phase, "pause ignored");
            return false;
        }

        self.ticker.cancel();

        let remaining_seconds = self.state.remaining_seconds;
        tracing::info!(remaining_seconds, "timer paused");
        self.emit(TimerEvent::Paused { remaining_seconds });
        self.publish();
        true
    }

    /// Resumes a paused timer. Returns false (no-op) otherwise, or when
    /// called outside a tokio runtime.
    pub fn resume(&mut self) -> bool {
        if !Ticker::can_arm() {
            tracing::warn!("resume ignored: no tokio runtime");
            return false;
        }
        if !self.state.resume() {
            tracing::debug!(phase = %self.state.phase, "resume ignored");
            return false;
        }

        self.ticker.arm();

        let remaining_seconds = self.state.remaining_seconds;
        tracing::info!(remaining_seconds, "timer resumed");
        self.emit(TimerEvent::Resumed { remaining_seconds });
        self.publish();
        true
    }

    /// Stops the timer from any phase and re-arms the configured duration.
    pub fn reset(&mut self) {
        self.ticker.cancel();
        self.state.reset();

        tracing::info!(remaining_seconds = self.state.remaining_seconds, "timer reset");
        self.emit(TimerEvent::Reset);
        self.publish();
    }

    /// Pauses, resumes or starts depending on the current phase.
    pub fn toggle(&mut self) {
        match self.state.phase {
            TimerPhase::Running => {
                self.pause();
            }
            TimerPhase::Paused => {
                self.resume();
            }
            TimerPhase::Stopped => {
                self.start();
            }
        }
    }

    /// Applies a preset duration, aborting any run in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if `minutes` is outside the accepted range.
    pub fn set_preset(&mut self, minutes: u32) -> Result<(), ConfigError> {
        validate_duration(f64::from(minutes))?;

        self.ticker.cancel();
        self.state.apply_preset(minutes);

        tracing::info!(minutes, "preset applied");
        self.emit(TimerEvent::PresetApplied { minutes });
        self.publish();
        Ok(())
    }

    /// Changes the configured duration.
    ///
    /// # Errors
    ///
    /// Returns an error if `minutes` is not finite or outside the accepted range.
    pub fn set_duration(&mut self, minutes: f64) -> Result<(), ConfigError> {
        let minutes = validate_duration(minutes)?;
        self.state.set_duration(minutes);

        tracing::info!(minutes, phase = %self.state.phase, "duration changed");
        self.publish();
        Ok(())
    }

    /// Applies a tick if it belongs to the live registration.
    fn handle_tick(&mut self, tick: Tick) {
        if !self.ticker.accepts(tick) {
            tracing::debug!("stale tick discarded");
            return;
        }
        self.advance();
    }

    /// Consumes one second of the running countdown.
    fn advance(&mut self) {
        match self.state.tick() {
            TickOutcome::Idle => {}
            TickOutcome::Counting { remaining_seconds } => {
                tracing::debug!(remaining_seconds, "tick");
                self.emit(TimerEvent::Tick { remaining_seconds });
                self.publish();
            }
            TickOutcome::Expired { initial_minutes } => {
                self.ticker.cancel();
                tracing::info!(initial_minutes, "timer expired");
                self.emit(TimerEvent::Tick {
                    remaining_seconds: 0,
                });
                self.emit(TimerEvent::Expired { initial_minutes });
                self.publish();
            }
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("timer event receiver dropped");
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.state.snapshot());
    }

    /// Returns a reference to the current timer state.
    pub fn get_state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the current observable snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Returns the remaining seconds.
    pub fn remaining_seconds(&self) -> u32 {
        self.state.remaining_seconds
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TimerPhase {
        self.state.phase
    }

    /// Returns true while a tick registration is live.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_armed()
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("ticker", &self.ticker)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
