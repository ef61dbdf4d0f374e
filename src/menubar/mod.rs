//! Menu bar UI for the countdown timer.
//!
//! This module provides:
//! - Live `MM:SS` title in the status bar
//! - Dropdown menu with start/pause/resume, reset, presets and quit
//! - Mapping of menu clicks to engine commands
//!
//! # Architecture
//!
//! - `icon.rs`: Title and tooltip text (platform-independent)
//! - `menu.rs`: Menu model (platform-independent)
//! - `event.rs`: Menu ids, actions and tray updates (platform-independent)
//! - `mod.rs`: TrayIconManager (native tray icon on macOS, no-op elsewhere)
//!
//! Snapshots travel from the engine's watch channel to the tray over a
//! crossbeam channel as [`TrayUpdate::Refresh`]; clicks come back as
//! [`MenuAction`]s.

pub mod event;
pub mod icon;
pub mod menu;

pub use event::{EventHandler, MenuAction, MenuItemId, TrayUpdate};
pub use icon::IconManager;
pub use menu::{MenuBuilder, MenuConfig, MenuItemConfig};

use crate::types::TimerSnapshot;
use crossbeam_channel::Receiver;

// ============================================================================
// TrayIconManager
// ============================================================================

/// Manages the tray icon and its menu.
pub struct TrayIconManager {
    /// Title generation
    icon_manager: IconManager,
    /// Menu model
    menu_builder: MenuBuilder,
    /// Click handling
    event_handler: EventHandler,
    /// Last snapshot received
    current: TimerSnapshot,
    /// Updates from the presenter
    update_rx: Receiver<TrayUpdate>,
    /// Whether the manager is initialized
    initialized: bool,
    /// Native tray icon (macOS only)
    #[cfg(target_os = "macos")]
    tray_icon: Option<tray_icon::TrayIcon>,
}

impl TrayIconManager {
    /// Creates a new TrayIconManager.
    ///
    /// On macOS the native icon is created by [`initialize`](Self::initialize).
    pub fn new(initial: TimerSnapshot, presets: Vec<u32>, update_rx: Receiver<TrayUpdate>) -> Self {
        let mut icon_manager = IconManager::new();
        icon_manager.phase_changed(initial.phase);

        Self {
            icon_manager,
            menu_builder: MenuBuilder::new(presets),
            event_handler: EventHandler::new(),
            current: initial,
            update_rx,
            initialized: false,
            #[cfg(target_os = "macos")]
            tray_icon: None,
        }
    }

    /// Returns whether the manager is initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the last snapshot received.
    pub fn current(&self) -> &TimerSnapshot {
        &self.current
    }

    /// Generates the current title for the menu bar.
    pub fn generate_title(&self) -> String {
        self.icon_manager.generate_title(&self.current)
    }

    /// Generates the current menu configuration.
    pub fn generate_menu_config(&self) -> MenuConfig {
        self.menu_builder.build(&self.current)
    }

    /// Processes every pending update.
    ///
    /// Returns the number of updates handled.
    pub fn process_pending_updates(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.update_rx.try_recv() {
                Ok(update) => {
                    self.handle_update(update);
                    handled += 1;
                }
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    if self.initialized {
                        tracing::warn!("menu bar update channel disconnected");
                        self.shutdown();
                    }
                    break;
                }
            }
        }
        handled
    }

    fn handle_update(&mut self, update: TrayUpdate) {
        match update {
            TrayUpdate::Refresh(snapshot) => {
                let rebuild = self.icon_manager.phase_changed(snapshot.phase);
                self.current = snapshot;
                self.refresh_native(rebuild);
            }
            TrayUpdate::Shutdown => {
                tracing::info!("menu bar shutting down");
                self.shutdown();
            }
        }
    }

    /// Returns the action for a pending menu click, if any.
    pub fn poll_menu_action(&self) -> Option<MenuAction> {
        self.next_clicked_item()
            .and_then(|id| self.event_handler.handle_click(id))
    }

    /// Removes the tray icon.
    pub fn shutdown(&mut self) {
        self.initialized = false;
        #[cfg(target_os = "macos")]
        {
            self.tray_icon = None;
        }
    }

    /// Creates the native tray icon (macOS only).
    ///
    /// Must be called from the main thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the tray icon cannot be created.
    #[cfg(target_os = "macos")]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        use anyhow::Context;
        use tray_icon::TrayIconBuilder;

        let menu = build_native_menu(&self.generate_menu_config())?;

        let tray_icon = TrayIconBuilder::new()
            .with_title(self.generate_title())
            .with_tooltip(self.icon_manager.generate_tooltip(&self.current))
            .with_menu(Box::new(menu))
            .build()
            .context("failed to create tray icon")?;

        self.tray_icon = Some(tray_icon);
        self.initialized = true;

        tracing::info!("menu bar icon initialized");
        Ok(())
    }

    /// Initializes the tray icon (non-macOS, no-op).
    #[cfg(not(target_os = "macos"))]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        tracing::warn!("menu bar icon is only supported on macOS");
        self.initialized = true;
        Ok(())
    }

    /// Lets the native UI process pending events (macOS only).
    ///
    /// Runs the main thread's run loop once without blocking. Must be called
    /// from the main thread.
    #[cfg(target_os = "macos")]
    pub fn pump_native_events(&self) {
        use objc2_foundation::{NSDate, NSRunLoop};

        let run_loop = NSRunLoop::currentRunLoop();
        let now = NSDate::dateWithTimeIntervalSinceNow(0.0);
        #[allow(unused_unsafe)]
        unsafe {
            run_loop.runUntilDate(&now);
        }
    }

    /// Lets the native UI process pending events (non-macOS, no-op).
    #[cfg(not(target_os = "macos"))]
    pub fn pump_native_events(&self) {}

    #[cfg(target_os = "macos")]
    fn refresh_native(&mut self, rebuild_menu: bool) {
        let Some(ref tray_icon) = self.tray_icon else {
            return;
        };

        tray_icon.set_title(Some(self.icon_manager.generate_title(&self.current)));
        if let Err(e) =
            tray_icon.set_tooltip(Some(self.icon_manager.generate_tooltip(&self.current)))
        {
            tracing::debug!(error = %e, "failed to update tooltip");
        }

        if rebuild_menu {
            match build_native_menu(&self.menu_builder.build(&self.current)) {
                Ok(menu) => tray_icon.set_menu(Some(Box::new(menu))),
                Err(e) => tracing::warn!(error = %e, "failed to rebuild menu"),
            }
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn refresh_native(&mut self, rebuild_menu: bool) {
        tracing::trace!(
            title = %self.generate_title(),
            rebuild_menu,
            "menu bar refresh (no native icon)"
        );
    }

    #[cfg(target_os = "macos")]
    fn next_clicked_item(&self) -> Option<MenuItemId> {
        tray_icon::menu::MenuEvent::receiver()
            .try_recv()
            .ok()
            .map(|event| MenuItemId::parse(event.id.as_ref()))
    }

    #[cfg(not(target_os = "macos"))]
    fn next_clicked_item(&self) -> Option<MenuItemId> {
        None
    }
}

/// Builds a native menu from the configuration (macOS only).
#[cfg(target_os = "macos")]
fn build_native_menu(config: &MenuConfig) -> anyhow::Result<tray_icon::menu::Menu> {
    use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};

    let item = |c: &MenuItemConfig| MenuItem::with_id(c.id.as_id(), &c.text, c.enabled, None);

    let menu = Menu::new();

    menu.append(&MenuItem::new(&config.title.text, false, None))?;
    menu.append(&MenuItem::new(&config.status.text, false, None))?;
    menu.append(&PredefinedMenuItem::separator())?;

    menu.append(&item(&config.toggle))?;
    menu.append(&item(&config.reset))?;
    menu.append(&PredefinedMenuItem::separator())?;

    for preset in &config.presets {
        menu.append(&item(preset))?;
    }
    menu.append(&PredefinedMenuItem::separator())?;

    menu.append(&item(&config.quit))?;

    Ok(menu)
}

impl std::fmt::Debug for TrayIconManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayIconManager")
            .field("initialized", &self.initialized)
            .field("current", &self.current)
            .field("icon_manager", &self.icon_manager)
            .field("menu_builder", &self.menu_builder)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
