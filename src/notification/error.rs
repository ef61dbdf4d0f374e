//! Notification system error types.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to request notification authorization from the system.
    #[error("failed to request notification authorization: {0}")]
    AuthorizationFailed(String),

    /// Failed to deliver a notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// Notification permission was denied by the user.
    #[error("notification permission denied")]
    PermissionDenied,

    /// Failed to initialize the notification system.
    #[error("failed to initialize notifications: {0}")]
    InitializationFailed(String),

    /// The notification center is not available.
    #[error("notification center is not available")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "allow notifications for this app in the system notification settings"
            }
            Self::SendFailed(_) => "check that a notification daemon is running",
            Self::InitializationFailed(_) => "restart the application",
            Self::NotAvailable => "notifications are not supported in this session",
        }
    }
}
