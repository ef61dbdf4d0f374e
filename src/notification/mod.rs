//! Expiry notifications.
//!
//! This module turns the engine's `Expired` events into desktop alerts:
//!
//! - [`NotificationSender`]: the delivery seam, implemented per platform
//! - [`NotificationDispatcher`]: consumes timer events and sends alerts
//! - macOS: `UNUserNotificationCenter` via `objc2-user-notifications`
//! - other desktops: notify-rust
//!
//! # Example
//!
//! ```rust,ignore
//! use cirrus::notification::{init_platform_notifier, NotificationDispatcher};
//!
//! let notifier = init_platform_notifier(Duration::from_secs(1)).await;
//! let dispatcher = NotificationDispatcher::new(notifier);
//! dispatcher.run(event_rx).await;
//! ```
//!
//! # Code Signing
//!
//! On macOS the binary must be code-signed for notifications to be delivered.
//! For development, use ad-hoc signing:
//! ```bash
//! codesign --force --deep --sign - target/release/cirrus
//! ```

mod content;
mod dispatcher;
pub mod error;

#[cfg(target_os = "macos")]
mod center;
#[cfg(target_os = "macos")]
mod request;

#[cfg(not(target_os = "macos"))]
mod desktop;

use std::time::Duration;

pub use self::content::{minute_noun, ExpiryMessage, APP_NAME, EXPIRED_REQUEST_ID, EXPIRED_TITLE};
pub use self::dispatcher::NotificationDispatcher;
pub use self::error::NotificationError;

#[cfg(target_os = "macos")]
pub use self::content::{create_expired_content, NotificationContentBuilder};
#[cfg(not(target_os = "macos"))]
pub use self::desktop::DesktopNotifier;

/// Delay between expiry and delivery of the alert.
pub const DEFAULT_DELIVERY_DELAY: Duration = Duration::from_secs(1);

/// Delivery seam for expiry alerts.
#[allow(async_fn_in_trait)]
pub trait NotificationSender {
    /// Shows the alert for a run started with `initial_minutes`.
    async fn send_expired(&self, initial_minutes: u32) -> Result<(), NotificationError>;

    /// Returns false if alerts cannot currently be delivered.
    fn is_available(&self) -> bool;
}

// ============================================================================
// macOS
// ============================================================================

/// Sends expiry alerts through `UNUserNotificationCenter`.
#[cfg(target_os = "macos")]
pub struct NotificationManager {
    delay: Duration,
}

#[cfg(target_os = "macos")]
impl NotificationManager {
    /// Requests authorization and creates the manager.
    ///
    /// # Errors
    ///
    /// Returns an error if authorization fails or is denied.
    pub async fn new(delay: Duration) -> Result<Self, NotificationError> {
        let granted = center::request_authorization().await?;
        if !granted {
            return Err(NotificationError::PermissionDenied);
        }
        Ok(Self { delay })
    }

    /// Creates a notification manager with fallback behavior.
    ///
    /// Returns `None` if initialization fails (with error logged),
    /// allowing the timer to keep running without notifications.
    pub async fn new_with_fallback(delay: Duration) -> Option<Self> {
        match Self::new(delay).await {
            Ok(manager) => Some(manager),
            Err(e) => {
                tracing::warn!(error = %e, suggestion = e.suggestion(), "notifications disabled");
                None
            }
        }
    }
}

#[cfg(target_os = "macos")]
impl NotificationSender for NotificationManager {
    async fn send_expired(&self, initial_minutes: u32) -> Result<(), NotificationError> {
        let message = ExpiryMessage::new(initial_minutes);
        let content = create_expired_content(&message);
        let request = request::create_expired_request(&content, self.delay);
        center::add_request(&request).await
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Platform sender used by the binary.
#[cfg(target_os = "macos")]
pub type PlatformNotifier = NotificationManager;

/// Platform sender used by the binary.
#[cfg(not(target_os = "macos"))]
pub type PlatformNotifier = DesktopNotifier;

/// Initializes the platform sender, or `None` if notifications are unavailable
/// (for example when permission was denied).
pub async fn init_platform_notifier(delay: Duration) -> Option<PlatformNotifier> {
    PlatformNotifier::new_with_fallback(delay).await
}

// ============================================================================
// Mock
// ============================================================================

/// Records alerts instead of showing them.
#[derive(Debug)]
pub struct MockNotificationSender {
    sent: std::sync::Mutex<Vec<ExpiryMessage>>,
    available: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockNotificationSender {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            available: std::sync::atomic::AtomicBool::new(true),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available
            .store(available, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<ExpiryMessage> {
        self.sent.lock().unwrap().clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for MockNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSender for MockNotificationSender {
    async fn send_expired(&self, initial_minutes: u32) -> Result<(), NotificationError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("mock failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push(ExpiryMessage::new(initial_minutes));
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl<S: NotificationSender> NotificationSender for std::sync::Arc<S> {
    async fn send_expired(&self, initial_minutes: u32) -> Result<(), NotificationError> {
        S::send_expired(self, initial_minutes).await
    }

    fn is_available(&self) -> bool {
        S::is_available(self)
    }
}
