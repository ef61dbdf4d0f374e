//! Event handling for menu bar interactions.
//!
//! Menu item ids are plain strings (`toggle`, `reset`, `preset:25`, `quit`)
//! so they can round-trip through tray-icon's `MenuId`.

use std::fmt;

use crate::engine::TimerCommand;
use crate::types::TimerSnapshot;

const PRESET_PREFIX: &str = "preset:";

// ============================================================================
// MenuAction
// ============================================================================

/// Actions that can be triggered from the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Start, pause or resume
    Toggle,
    /// Stop and re-arm
    Reset,
    /// Apply a preset duration in minutes
    Preset(u32),
    /// Quit the application
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Toggle => write!(f, "toggle"),
            MenuAction::Reset => write!(f, "reset"),
            MenuAction::Preset(minutes) => write!(f, "preset {}", minutes),
            MenuAction::Quit => write!(f, "quit"),
        }
    }
}

impl MenuAction {
    /// Returns the engine command for this action.
    pub fn to_command(&self) -> TimerCommand {
        match self {
            MenuAction::Toggle => TimerCommand::Toggle,
            MenuAction::Reset => TimerCommand::Reset,
            MenuAction::Preset(minutes) => TimerCommand::SetPreset(*minutes),
            MenuAction::Quit => TimerCommand::Shutdown,
        }
    }
}

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for clickable menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    Toggle,
    Reset,
    Preset(u32),
    Quit,
    /// Unknown or non-clickable menu item
    Unknown,
}

impl MenuItemId {
    /// Parses a menu id string.
    pub fn parse(id: &str) -> Self {
        match id {
            "toggle" => MenuItemId::Toggle,
            "reset" => MenuItemId::Reset,
            "quit" => MenuItemId::Quit,
            other => other
                .strip_prefix(PRESET_PREFIX)
                .and_then(|m| m.parse().ok())
                .map_or(MenuItemId::Unknown, MenuItemId::Preset),
        }
    }

    /// Returns the menu id string.
    pub fn as_id(&self) -> String {
        match self {
            MenuItemId::Toggle => "toggle".to_string(),
            MenuItemId::Reset => "reset".to_string(),
            MenuItemId::Preset(minutes) => format!("{}{}", PRESET_PREFIX, minutes),
            MenuItemId::Quit => "quit".to_string(),
            MenuItemId::Unknown => "unknown".to_string(),
        }
    }

    /// Converts a menu item ID to the corresponding action.
    pub fn to_action(&self) -> Option<MenuAction> {
        match self {
            MenuItemId::Toggle => Some(MenuAction::Toggle),
            MenuItemId::Reset => Some(MenuAction::Reset),
            MenuItemId::Preset(minutes) => Some(MenuAction::Preset(*minutes)),
            MenuItemId::Quit => Some(MenuAction::Quit),
            MenuItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Converts menu clicks into actions.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    /// Creates a new EventHandler.
    pub fn new() -> Self {
        Self
    }

    /// Processes a menu item click and returns the corresponding action.
    pub fn handle_click(&self, item_id: MenuItemId) -> Option<MenuAction> {
        let action = item_id.to_action();

        if let Some(ref action) = action {
            tracing::info!(action = %action, "menu action received");
        } else {
            tracing::debug!(?item_id, "click on inert menu item");
        }

        action
    }
}

// ============================================================================
// TrayUpdate
// ============================================================================

/// Updates sent to the tray icon from the presenter.
///
/// Sent over crossbeam-channel from tokio tasks to the thread that owns the
/// tray icon.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// New timer state to display
    Refresh(TimerSnapshot),
    /// Remove the tray icon
    Shutdown,
}

// ============================================================================
// Tests
// ============================================================================
