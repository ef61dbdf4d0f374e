//! Cirrus Timer Library
//!
//! This library provides the core functionality for the Cirrus menu bar
//! countdown timer. It includes:
//! - Timer engine owning the countdown state and its 1 Hz ticker
//! - Expiry notifications (UserNotifications on macOS, notify-rust elsewhere)
//! - Menu bar UI with tray icon (macOS only)
//! - CLI flag parsing, console commands and display utilities
//! - Type definitions for configuration and state

pub mod cli;
pub mod engine;
pub mod menubar;
pub mod notification;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    time_string, validate_duration, ConfigError, TimerConfig, TimerPhase, TimerSnapshot,
    TimerState,
};

pub use engine::{TimerCommand, TimerEngine, TimerEvent};

pub use notification::{
    init_platform_notifier, ExpiryMessage, MockNotificationSender, NotificationDispatcher,
    NotificationError, NotificationSender, PlatformNotifier,
};

// Re-export menubar types
pub use menubar::{
    EventHandler, IconManager, MenuAction, MenuBuilder, MenuConfig, MenuItemConfig, MenuItemId,
    TrayIconManager, TrayUpdate,
};
