//! CLI module for the Cirrus timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Flag definitions using clap derive
//! - `console`: Line commands read from stdin
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod console;
pub mod display;

pub use commands::{Cli, Commands};
pub use console::{Console, ConsoleCommand, ConsoleError, LineOutcome};
pub use display::Display;
