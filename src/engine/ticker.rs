//! Cancellable one-second tick registration.
//!
//! A [`Ticker`] owns at most one spawned interval task. Each arming bumps a
//! generation counter stamped onto every [`Tick`] it produces, so ticks that
//! were already queued when the registration was cancelled can be recognised
//! and dropped by the engine.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One elapsed period, stamped with the registration that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

/// Owned, cancellable periodic tick source.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
    tick_tx: mpsc::UnboundedSender<Tick>,
}

impl Ticker {
    /// Creates a disarmed ticker that will deliver ticks to `tick_tx`.
    pub fn new(period: Duration, tick_tx: mpsc::UnboundedSender<Tick>) -> Self {
        Self {
            period,
            generation: 0,
            handle: None,
            tick_tx,
        }
    }

    /// Returns true if the calling thread can arm a registration.
    pub fn can_arm() -> bool {
        Handle::try_current().is_ok()
    }

    /// Starts a fresh registration, cancelling any existing one first.
    ///
    /// The first tick arrives one full period after arming. Outside a tokio
    /// runtime nothing is armed and false is returned.
    pub fn arm(&mut self) -> bool {
        self.cancel();

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("no tokio runtime; tick registration not armed");
            return false;
        };
        self.generation = self.generation.wrapping_add(1);

        let tick = Tick {
            generation: self.generation,
        };
        let period = self.period;
        let tick_tx = self.tick_tx.clone();

        self.handle = Some(runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            // Catch up after a stall so every elapsed second is counted.
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

            loop {
                interval.tick().await;
                if tick_tx.send(tick).is_err() {
                    break;
                }
            }
        }));

        tracing::trace!(generation = self.generation, "tick registration armed");
        true
    }

    /// Cancels the current registration. Cancelling twice is a no-op.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::trace!(generation = self.generation, "tick registration cancelled");
        }
    }

    /// Returns true while a registration is live.
    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Returns true if `tick` belongs to the live registration.
    pub fn accepts(&self, tick: Tick) -> bool {
        self.is_armed() && tick.generation == self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
