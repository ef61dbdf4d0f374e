//! Title and tooltip text for the menu bar.
//!
//! The text generation logic is platform-independent and fully testable.

use crate::types::{TimerPhase, TimerSnapshot};

// ============================================================================
// IconManager
// ============================================================================

/// Generates the status bar title and tracks phase changes.
#[derive(Debug, Default)]
pub struct IconManager {
    /// Last known timer phase
    last_phase: Option<TimerPhase>,
}

impl IconManager {
    /// Creates a new IconManager.
    pub fn new() -> Self {
        Self { last_phase: None }
    }

    /// Generates the title text shown in the status bar.
    ///
    /// The remaining time as `MM:SS`, in every phase.
    ///
    /// # Examples
    ///
    /// ```
    /// use cirrus::menubar::icon::IconManager;
    /// use cirrus::types::TimerState;
    ///
    /// let manager = IconManager::new();
    /// let state = TimerState::new(25.0);
    /// assert_eq!(manager.generate_title(&state.snapshot()), "25:00");
    /// ```
    pub fn generate_title(&self, snapshot: &TimerSnapshot) -> String {
        snapshot.time_string()
    }

    /// Generates the tooltip text.
    pub fn generate_tooltip(&self, snapshot: &TimerSnapshot) -> String {
        match snapshot.phase {
            TimerPhase::Running => format!("Cirrus: {} left", snapshot.time_string()),
            TimerPhase::Paused => format!("Cirrus: paused at {}", snapshot.time_string()),
            TimerPhase::Stopped => "Cirrus: stopped".to_string(),
        }
    }

    /// Checks if the phase has changed since the last call.
    ///
    /// Used to rebuild the menu only when the toggle label changes.
    pub fn phase_changed(&mut self, phase: TimerPhase) -> bool {
        let changed = self.last_phase != Some(phase);
        if changed {
            self.last_phase = Some(phase);
        }
        changed
    }
}

// ============================================================================
// Tests
// ============================================================================
