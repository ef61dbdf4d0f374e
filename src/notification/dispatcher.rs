//! Routes timer events to the notification sender.

use tokio::sync::mpsc;

use super::content::ExpiryMessage;
use super::NotificationSender;
use crate::engine::TimerEvent;

/// Consumes [`TimerEvent`]s and shows an alert for each expiry.
///
/// Delivery is best effort: failures are logged and never retried or
/// reported back to the engine. Without a sender (permission denied, no
/// notification daemon) expiries are only logged.
#[derive(Debug)]
pub struct NotificationDispatcher<S> {
    sender: Option<S>,
}

impl<S: NotificationSender> NotificationDispatcher<S> {
    /// Creates a dispatcher. `None` disables delivery.
    pub fn new(sender: Option<S>) -> Self {
        Self { sender }
    }

    /// Returns true if alerts will be attempted.
    pub fn is_enabled(&self) -> bool {
        self.sender.as_ref().is_some_and(|s| s.is_available())
    }

    /// Handles events until the engine drops its sender.
    pub async fn run(&self, mut events: mpsc::UnboundedReceiver<TimerEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(&event).await;
        }
        tracing::debug!("timer event channel closed");
    }

    /// Handles one event. Returns true if an alert was delivered.
    pub async fn handle(&self, event: &TimerEvent) -> bool {
        let TimerEvent::Expired { initial_minutes } = *event else {
            return false;
        };

        let sender = match &self.sender {
            Some(sender) if sender.is_available() => sender,
            _ => {
                let message = ExpiryMessage::new(initial_minutes);
                tracing::info!(body = %message.body, "timer finished (notifications disabled)");
                return false;
            }
        };

        match sender.send_expired(initial_minutes).await {
            Ok(()) => {
                tracing::info!(initial_minutes, "expiry notification sent");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, suggestion = e.suggestion(), "failed to send expiry notification");
                false
            }
        }
    }
}
