//! Engine module for the countdown timer.
//!
//! - `timer`: Timer engine with state transitions, commands and events
//! - `ticker`: Cancellable one-second tick registration

pub mod ticker;
pub mod timer;

pub use ticker::{Tick, Ticker, TICK_PERIOD};
pub use timer::{TimerCommand, TimerEngine, TimerEvent};
