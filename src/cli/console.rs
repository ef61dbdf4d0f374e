//! Interactive line commands read from stdin.
//!
//! The console is a second way to drive the engine next to the tray menu.
//! Each line is parsed into a [`ConsoleCommand`]; timer controls are
//! forwarded to the engine, `status` and `help` are answered locally.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};

use super::display::Display;
use crate::engine::TimerCommand;
use crate::types::{validate_duration, ConfigError, TimerSnapshot};

// ============================================================================
// ConsoleError
// ============================================================================

/// Errors raised while parsing a console line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    /// First word is not a known command.
    #[error("unknown command `{0}` (type `help` for a list)")]
    UnknownCommand(String),

    /// Command needs an argument that was not given.
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    /// Argument could not be parsed.
    #[error("invalid argument `{value}` for `{command}`")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },

    /// Duration parsed but failed validation.
    #[error(transparent)]
    InvalidDuration(#[from] ConfigError),
}

// ============================================================================
// ConsoleCommand
// ============================================================================

/// One parsed console line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    /// Forward to the engine
    Timer(TimerCommand),
    /// Print the current state
    Status { json: bool },
    /// Print the command list
    Help,
    /// Shut the application down
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(ConsoleCommand::Timer(TimerCommand::Toggle));
        };
        let arg = words.next();

        let command = match head.to_ascii_lowercase().as_str() {
            "t" | "toggle" => ConsoleCommand::Timer(TimerCommand::Toggle),
            "start" => ConsoleCommand::Timer(TimerCommand::Start),
            "pause" => ConsoleCommand::Timer(TimerCommand::Pause),
            "resume" => ConsoleCommand::Timer(TimerCommand::Resume),
            "reset" => ConsoleCommand::Timer(TimerCommand::Reset),
            "preset" => {
                let value = arg.ok_or(ConsoleError::MissingArgument("preset"))?;
                let minutes: u32 = value.parse().map_err(|_| ConsoleError::InvalidArgument {
                    command: "preset",
                    value: value.to_string(),
                })?;
                validate_duration(f64::from(minutes))?;
                ConsoleCommand::Timer(TimerCommand::SetPreset(minutes))
            }
            "duration" => {
                let value = arg.ok_or(ConsoleError::MissingArgument("duration"))?;
                let minutes: f64 = value.parse().map_err(|_| ConsoleError::InvalidArgument {
                    command: "duration",
                    value: value.to_string(),
                })?;
                ConsoleCommand::Timer(TimerCommand::SetDuration(validate_duration(minutes)?))
            }
            "status" => match arg {
                None => ConsoleCommand::Status { json: false },
                Some("json") => ConsoleCommand::Status { json: true },
                Some(other) => {
                    return Err(ConsoleError::InvalidArgument {
                        command: "status",
                        value: other.to_string(),
                    })
                }
            },
            "help" | "?" => ConsoleCommand::Help,
            "q" | "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }
}

// ============================================================================
// Console
// ============================================================================

/// Upper bound on waiting for the engine to publish after a forwarded
/// command. Commands the engine rejects publish nothing.
const APPLY_TIMEOUT: Duration = Duration::from_millis(250);

/// What the console does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Answered locally or rejected; read the next line.
    Continue,
    /// Sent to the engine; wait for it to apply before the next line.
    Forwarded,
    /// Quit was requested or the engine is gone.
    Stop,
}

/// Reads commands from a line source and forwards them to the engine.
#[derive(Debug)]
pub struct Console {
    commands: mpsc::UnboundedSender<TimerCommand>,
    snapshots: watch::Receiver<TimerSnapshot>,
}

impl Console {
    /// Creates a console feeding `commands` and answering `status` from
    /// `snapshots`.
    pub fn new(
        commands: mpsc::UnboundedSender<TimerCommand>,
        snapshots: watch::Receiver<TimerSnapshot>,
    ) -> Self {
        Self {
            commands,
            snapshots,
        }
    }

    /// Processes lines until EOF, `quit` or the engine goes away.
    ///
    /// EOF ends the console only; the engine keeps running.
    pub async fn run<R>(&mut self, reader: R) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            match self.handle_line(&line) {
                LineOutcome::Stop => return Ok(()),
                LineOutcome::Forwarded => self.wait_applied().await,
                LineOutcome::Continue => {}
            }
        }

        tracing::debug!("console input closed");
        Ok(())
    }

    /// Handles one line without waiting on the engine.
    pub fn handle_line(&mut self, line: &str) -> LineOutcome {
        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                Display::show_error(&e.to_string());
                return LineOutcome::Continue;
            }
        };

        match command {
            ConsoleCommand::Timer(command) => self.forward(command),
            ConsoleCommand::Status { json } => {
                let snapshot = self.snapshots.borrow().clone();
                if json {
                    Display::show_status_json(&snapshot);
                } else {
                    Display::show_status(&snapshot);
                }
                LineOutcome::Continue
            }
            ConsoleCommand::Help => {
                Display::show_help();
                LineOutcome::Continue
            }
            ConsoleCommand::Quit => {
                self.forward(TimerCommand::Shutdown);
                LineOutcome::Stop
            }
        }
    }

    fn forward(&mut self, command: TimerCommand) -> LineOutcome {
        // Anything published before this send is not the command's result.
        self.snapshots.borrow_and_update();

        if self.commands.send(command).is_err() {
            tracing::debug!(?command, "engine stopped; console exiting");
            return LineOutcome::Stop;
        }
        LineOutcome::Forwarded
    }

    /// Waits until the engine publishes a snapshot or [`APPLY_TIMEOUT`]
    /// passes.
    async fn wait_applied(&mut self) {
        if tokio::time::timeout(APPLY_TIMEOUT, self.snapshots.changed())
            .await
            .is_err()
        {
            tracing::debug!("engine published nothing for the last command");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
