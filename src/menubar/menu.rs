//! Menu model for the menu bar.
//!
//! Decides labels and enabled state from the timer snapshot. Native menu
//! creation with tray-icon happens in the platform-specific code.

use super::event::MenuItemId;
use crate::types::{TimerPhase, TimerSnapshot};

// ============================================================================
// MenuItemConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Item identifier
    pub id: MenuItemId,
    /// Display text for the menu item
    pub text: String,
    /// Whether the menu item is enabled (clickable)
    pub enabled: bool,
}

impl MenuItemConfig {
    /// Creates a new menu item configuration.
    pub fn new(id: MenuItemId, text: impl Into<String>, enabled: bool) -> Self {
        Self {
            id,
            text: text.into(),
            enabled,
        }
    }

    /// Creates a disabled, informational item.
    pub fn label(text: impl Into<String>) -> Self {
        Self::new(MenuItemId::Unknown, text, false)
    }
}

// ============================================================================
// MenuConfig
// ============================================================================

/// Complete menu configuration for one timer snapshot.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    /// Header (always disabled)
    pub title: MenuItemConfig,
    /// Current state line (always disabled)
    pub status: MenuItemConfig,
    /// Start / Pause / Resume
    pub toggle: MenuItemConfig,
    /// Reset button
    pub reset: MenuItemConfig,
    /// One item per preset
    pub presets: Vec<MenuItemConfig>,
    /// Quit button (always enabled)
    pub quit: MenuItemConfig,
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds menu configuration from timer snapshots.
#[derive(Debug, Default)]
pub struct MenuBuilder {
    presets: Vec<u32>,
}

impl MenuBuilder {
    /// Creates a builder offering the given presets.
    pub fn new(presets: Vec<u32>) -> Self {
        Self { presets }
    }

    /// Returns the configured presets.
    pub fn presets(&self) -> &[u32] {
        &self.presets
    }

    /// Builds a complete menu configuration.
    pub fn build(&self, snapshot: &TimerSnapshot) -> MenuConfig {
        MenuConfig {
            title: MenuItemConfig::label("Cirrus Timer"),
            status: MenuItemConfig::label(Self::status_text(snapshot)),
            toggle: MenuItemConfig::new(MenuItemId::Toggle, Self::toggle_text(snapshot.phase), true),
            reset: MenuItemConfig::new(MenuItemId::Reset, "Reset", !snapshot.is_fully_armed()),
            presets: self
                .presets
                .iter()
                .map(|&minutes| {
                    MenuItemConfig::new(MenuItemId::Preset(minutes), format!("{} min", minutes), true)
                })
                .collect(),
            quit: MenuItemConfig::new(MenuItemId::Quit, "Quit", true),
        }
    }

    fn status_text(snapshot: &TimerSnapshot) -> String {
        match snapshot.phase {
            TimerPhase::Running => format!("Running · {} left", snapshot.time_string()),
            TimerPhase::Paused => format!("Paused · {} left", snapshot.time_string()),
            TimerPhase::Stopped => format!("Stopped · {}", snapshot.time_string()),
        }
    }

    fn toggle_text(phase: TimerPhase) -> &'static str {
        match phase {
            TimerPhase::Running => "Pause",
            TimerPhase::Paused => "Resume",
            TimerPhase::Stopped => "Start",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
