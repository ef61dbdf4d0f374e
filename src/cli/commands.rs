//! Command definitions for the Cirrus CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::types::{validate_duration, TimerConfig, DEFAULT_PRESETS};

// ============================================================================
// CLI Structure
// ============================================================================

/// Cirrus - a menu bar countdown timer
#[derive(Parser, Debug)]
#[command(
    name = "cirrus",
    version,
    about = "Menu bar countdown timer with desktop notifications",
    long_about = "A single countdown timer shown in the menu bar as MM:SS.\n\
                  Control it from the tray menu or by typing commands on stdin \
                  (type `help` once it is running).",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Timer duration in minutes (1-1440, fractions allowed)
    #[arg(short, long, default_value = "25", value_parser = parse_duration)]
    pub duration: f64,

    /// Start counting down immediately
    #[arg(short, long)]
    pub start: bool,

    /// Seconds between expiry and the alert being shown
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(0..=60))]
    pub notification_delay: u64,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the timer configuration from the parsed flags.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            duration_minutes: self.duration,
            presets: DEFAULT_PRESETS.to_vec(),
        }
    }

    /// Returns the notification delivery delay.
    pub fn notification_delay(&self) -> Duration {
        Duration::from_secs(self.notification_delay)
    }
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses and validates a duration in minutes.
fn parse_duration(s: &str) -> Result<f64, String> {
    let minutes: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number of minutes", s))?;
    validate_duration(minutes).map_err(|e| e.to_string())
}

// ============================================================================
// Tests
// ============================================================================
