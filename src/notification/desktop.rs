//! Desktop notifications for Linux, the BSDs and Windows via notify-rust.

use std::time::Duration;

use super::content::{ExpiryMessage, APP_NAME};
use super::error::NotificationError;
use super::NotificationSender;

/// Sends expiry alerts through the desktop's notification daemon.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    delay: Duration,
}

impl DesktopNotifier {
    /// Creates a notifier that waits `delay` before showing each alert.
    pub fn new(delay: Duration) -> Self {
        tracing::debug!(?delay, "desktop notifier created");
        Self { delay }
    }

    /// Creates a notifier. Desktop daemons need no authorization, so this
    /// never falls back.
    pub async fn new_with_fallback(delay: Duration) -> Option<Self> {
        Some(Self::new(delay))
    }

    async fn show(&self, message: ExpiryMessage) -> Result<(), NotificationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .appname(APP_NAME)
                .summary(&message.title)
                .body(&message.body)
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::SendFailed(e.to_string()))?
    }
}

impl NotificationSender for DesktopNotifier {
    async fn send_expired(&self, initial_minutes: u32) -> Result<(), NotificationError> {
        self.show(ExpiryMessage::new(initial_minutes)).await
    }

    fn is_available(&self) -> bool {
        true
    }
}
