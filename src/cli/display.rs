//! Display utilities for the Cirrus console.
//!
//! This module provides formatted output for:
//! - Status display (text and JSON)
//! - Phase transition echoes
//! - Help and error messages
//!
//! Formatting lives in `*_text` functions so it can be tested without
//! capturing stdout; the `show_*` functions only print.

use crate::types::{TimerPhase, TimerSnapshot};

/// Shown once at startup when alerts cannot be delivered.
pub const NOTIFICATIONS_DISABLED: &str = "Notifications Disabled: This app, being a timer app, \
    requires notifications to function properly. Notifications will not be shown when the \
    timer runs out.";

const HELP: &str = "\
Commands:
  <enter>, t, toggle   start, pause or resume
  start                start a stopped timer
  pause                pause a running timer
  resume               resume a paused timer
  reset                stop and reload the duration
  preset <minutes>     stop and load a whole-minute preset
  duration <minutes>   change the duration (applies on next reset/start)
  status [json]        show the current state
  help                 show this list
  q, quit, exit        quit";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for console output.
pub struct Display;

impl Display {
    /// Shows the startup banner.
    pub fn show_banner(snapshot: &TimerSnapshot) {
        println!("Cirrus timer ready: {}", Self::status_text(snapshot));
        println!("Type `help` for commands.");
    }

    /// Shows the current timer status.
    pub fn show_status(snapshot: &TimerSnapshot) {
        println!("{}", Self::status_text(snapshot));
    }

    /// Shows the current timer status as a JSON object.
    pub fn show_status_json(snapshot: &TimerSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => Self::show_error(&format!("failed to encode status: {}", e)),
        }
    }

    /// Echoes a phase transition, if the change is worth reporting.
    pub fn show_transition(previous: &TimerSnapshot, current: &TimerSnapshot) {
        if let Some(message) = Self::transition_text(previous, current) {
            println!("{}", message);
        }
    }

    /// Shows the command list.
    pub fn show_help() {
        println!("{}", HELP);
    }

    /// Warns that alerts will not be shown.
    pub fn show_notifications_disabled() {
        eprintln!("{}", NOTIFICATIONS_DISABLED);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// One-line status, e.g. `running 24:59 (25 min)`.
    pub fn status_text(snapshot: &TimerSnapshot) -> String {
        format!(
            "{} {} ({} min)",
            snapshot.phase,
            snapshot.time_string(),
            Self::format_minutes(snapshot.duration_minutes)
        )
    }

    /// Message for a change between two snapshots.
    ///
    /// Ticks produce nothing; phase changes and reloads while stopped do.
    pub fn transition_text(previous: &TimerSnapshot, current: &TimerSnapshot) -> Option<String> {
        use TimerPhase::*;

        let time = current.time_string();
        let message = match (previous.phase, current.phase) {
            (Stopped, Running) => format!("> started: {} left", time),
            (Running, Paused) => format!("|| paused at {}", time),
            (Paused, Running) => format!("> resumed: {} left", time),
            (Running, Stopped) if current.remaining_seconds == 0 => {
                "* time's up! 00:00".to_string()
            }
            (Running | Paused, Stopped) => format!("[] reset to {}", time),
            (Stopped, Stopped) if previous.remaining_seconds != current.remaining_seconds => {
                format!("[] set to {}", time)
            }
            _ => return None,
        };

        Some(message)
    }

    /// Formats a duration without a trailing `.0` for whole minutes.
    fn format_minutes(minutes: f64) -> String {
        if minutes.fract() == 0.0 {
            format!("{:.0}", minutes)
        } else {
            format!("{}", minutes)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
