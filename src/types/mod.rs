//! Core data types for the countdown timer.
//!
//! This module defines the data structures used for:
//! - Timer phase and state transitions
//! - Timer configuration with validation
//! - The observable snapshot published to presentation layers
//! - `MM:SS` formatting

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Duration used when none is configured.
pub const DEFAULT_DURATION_MINUTES: f64 = 25.0;

/// Shortest accepted duration. Anything below truncates to a zero-length run.
pub const MIN_DURATION_MINUTES: f64 = 1.0;

/// Longest accepted duration (one day).
pub const MAX_DURATION_MINUTES: f64 = 1440.0;

/// Presets offered by the menu.
pub const DEFAULT_PRESETS: [u32; 6] = [5, 10, 15, 25, 45, 60];

// ============================================================================
// Formatting
// ============================================================================

/// Formats a number of seconds as zero-padded `MM:SS`.
///
/// Minutes are not rolled over into hours, so one hour renders as `60:00`.
pub fn time_string(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Whole minutes of a (possibly fractional) duration.
pub fn whole_minutes(duration_minutes: f64) -> u32 {
    // `as` saturates and maps NaN to 0; validated durations never hit either.
    duration_minutes.trunc() as u32
}

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current lifecycle phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Timer is at rest (initial state, after reset or expiry)
    #[default]
    Stopped,
    /// Timer is counting down
    Running,
    /// Timer is paused mid-run
    Paused,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Stopped => "stopped",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
        }
    }
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Errors raised when a duration fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// NaN or infinite duration.
    #[error("duration must be a finite number of minutes")]
    NotFinite,

    /// Duration shorter than one whole minute.
    #[error("duration must be at least {min} minute, got {0}", min = MIN_DURATION_MINUTES)]
    TooShort(f64),

    /// Duration longer than the supported maximum.
    #[error("duration must be at most {max} minutes, got {0}", max = MAX_DURATION_MINUTES)]
    TooLong(f64),
}

/// Validates a duration in minutes.
pub fn validate_duration(minutes: f64) -> Result<f64, ConfigError> {
    if !minutes.is_finite() {
        return Err(ConfigError::NotFinite);
    }
    if minutes < MIN_DURATION_MINUTES {
        return Err(ConfigError::TooShort(minutes));
    }
    if minutes > MAX_DURATION_MINUTES {
        return Err(ConfigError::TooLong(minutes));
    }
    Ok(minutes)
}

/// Configuration for the countdown timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Initial duration in minutes (fractional allowed)
    pub duration_minutes: f64,
    /// Preset durations offered by the menu, in whole minutes
    pub presets: Vec<u32>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_DURATION_MINUTES,
            presets: DEFAULT_PRESETS.to_vec(),
        }
    }
}

impl TimerConfig {
    /// Creates a validated configuration with the given duration.
    pub fn new(duration_minutes: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            duration_minutes: validate_duration(duration_minutes)?,
            ..Self::default()
        })
    }

    /// Replaces the preset list, dropping entries that fail validation.
    pub fn with_presets(mut self, presets: impl IntoIterator<Item = u32>) -> Self {
        self.presets = presets
            .into_iter()
            .filter(|&m| validate_duration(f64::from(m)).is_ok())
            .collect();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_duration(self.duration_minutes)?;
        for &preset in &self.presets {
            validate_duration(f64::from(preset))?;
        }
        Ok(())
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Outcome of a single one-second tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed.
    Idle,
    /// One second was consumed and time remains.
    Counting {
        /// Seconds left after this tick
        remaining_seconds: u32,
    },
    /// The countdown reached zero on this tick.
    Expired {
        /// Whole minutes the finished run was started with
        initial_minutes: u32,
    },
}

/// Countdown state and its transitions.
///
/// Pure data: scheduling of ticks lives in [`crate::engine::TimerEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase of the timer
    pub phase: TimerPhase,
    /// Seconds left in the current run
    pub remaining_seconds: u32,
    /// Configured duration in minutes
    pub duration_minutes: f64,
    /// Whole minutes captured when the current run started
    initial_minutes: u32,
}

impl TimerState {
    /// Creates a stopped, fully armed state.
    pub fn new(duration_minutes: f64) -> Self {
        let initial_minutes = whole_minutes(duration_minutes);
        Self {
            phase: TimerPhase::Stopped,
            remaining_seconds: initial_minutes.saturating_mul(60),
            duration_minutes,
            initial_minutes,
        }
    }

    /// Seconds a fresh run of the configured duration starts from.
    pub fn armed_seconds(&self) -> u32 {
        whole_minutes(self.duration_minutes).saturating_mul(60)
    }

    /// Whole minutes captured at the start of the current (or last) run.
    pub fn initial_minutes(&self) -> u32 {
        self.initial_minutes
    }

    /// Starts a run. Only valid from `Stopped`.
    ///
    /// A timer left at zero by an expired run is re-armed first.
    pub fn start(&mut self) -> bool {
        if self.phase != TimerPhase::Stopped {
            return false;
        }
        if self.remaining_seconds == 0 {
            self.remaining_seconds = self.armed_seconds();
        }
        self.initial_minutes = whole_minutes(self.duration_minutes);
        self.phase = TimerPhase::Running;
        true
    }

    /// Pauses a running timer.
    pub fn pause(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.phase = TimerPhase::Paused;
        true
    }

    /// Resumes a paused timer. The run's initial minutes are kept.
    pub fn resume(&mut self) -> bool {
        if self.phase != TimerPhase::Paused {
            return false;
        }
        self.phase = TimerPhase::Running;
        true
    }

    /// Stops the timer and re-arms the configured duration.
    pub fn reset(&mut self) {
        self.phase = TimerPhase::Stopped;
        self.remaining_seconds = self.armed_seconds();
    }

    /// Changes the duration.
    ///
    /// While stopped the remaining time follows immediately; during a run the
    /// new value applies from the next reset or start.
    pub fn set_duration(&mut self, duration_minutes: f64) {
        self.duration_minutes = duration_minutes;
        if self.phase == TimerPhase::Stopped {
            self.remaining_seconds = self.armed_seconds();
        }
    }

    /// Applies a preset, aborting any run in progress.
    pub fn apply_preset(&mut self, minutes: u32) {
        self.duration_minutes = f64::from(minutes);
        self.reset();
    }

    /// Consumes one second.
    ///
    /// Expiry is reported exactly once, on the tick that takes the countdown
    /// from 1 to 0 (or on the first tick of a running timer already at 0).
    /// The timer is then stopped at `00:00`.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != TimerPhase::Running {
            return TickOutcome::Idle;
        }
        if self.remaining_seconds > 1 {
            self.remaining_seconds -= 1;
            return TickOutcome::Counting {
                remaining_seconds: self.remaining_seconds,
            };
        }
        self.remaining_seconds = 0;
        self.phase = TimerPhase::Stopped;
        TickOutcome::Expired {
            initial_minutes: self.initial_minutes,
        }
    }

    /// Returns true if the timer is counting down.
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Returns true if the timer is paused.
    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Paused
    }

    /// Returns the observable view of this state.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            duration_minutes: self.duration_minutes,
        }
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Read-only view of the timer, published after every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Current phase
    pub phase: TimerPhase,
    /// Seconds left
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Configured duration in minutes
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: f64,
}

impl TimerSnapshot {
    /// Remaining time as `MM:SS`.
    pub fn time_string(&self) -> String {
        time_string(self.remaining_seconds)
    }

    /// Returns true if the timer is stopped with the full duration loaded.
    pub fn is_fully_armed(&self) -> bool {
        self.phase == TimerPhase::Stopped
            && self.remaining_seconds == whole_minutes(self.duration_minutes) * 60
    }
}

// ============================================================================
// Tests
// ============================================================================
