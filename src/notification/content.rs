//! Notification content construction.
//!
//! The wording is platform-independent; the macOS builder below turns it into
//! `UNMutableNotificationContent`.

/// Title shown when a countdown finishes.
pub const EXPIRED_TITLE: &str = "Timer Finished!";

/// Identifier shared by every expiry alert, so a newer one replaces an older one.
pub const EXPIRED_REQUEST_ID: &str = "CirrusCountdownEnded";

/// Application name shown by desktop notification daemons.
pub const APP_NAME: &str = "Cirrus";

/// Returns "minute" for exactly one, "minutes" otherwise.
pub fn minute_noun(minutes: u32) -> &'static str {
    if minutes == 1 {
        "minute"
    } else {
        "minutes"
    }
}

/// Text of an expiry alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryMessage {
    /// Alert title
    pub title: String,
    /// Alert body
    pub body: String,
}

impl ExpiryMessage {
    /// Builds the alert for a run started with `initial_minutes`.
    pub fn new(initial_minutes: u32) -> Self {
        Self {
            title: EXPIRED_TITLE.to_string(),
            body: format!(
                "Your timer for {} {} has ended.",
                initial_minutes,
                minute_noun(initial_minutes)
            ),
        }
    }
}

#[cfg(target_os = "macos")]
pub use self::macos::{create_expired_content, NotificationContentBuilder};

#[cfg(target_os = "macos")]
mod macos {
    use objc2::rc::Retained;
    use objc2_foundation::NSString;
    use objc2_user_notifications::{UNMutableNotificationContent, UNNotificationSound};

    use super::ExpiryMessage;

    /// Builder for constructing notification content.
    pub struct NotificationContentBuilder {
        content: Retained<UNMutableNotificationContent>,
    }

    impl NotificationContentBuilder {
        #[must_use]
        pub fn new() -> Self {
            let content = unsafe { UNMutableNotificationContent::new() };
            Self { content }
        }

        #[must_use]
        pub fn title(self, title: &str) -> Self {
            let title = NSString::from_str(title);
            unsafe {
                self.content.setTitle(&title);
            }
            self
        }

        #[must_use]
        pub fn body(self, body: &str) -> Self {
            let body = NSString::from_str(body);
            unsafe {
                self.content.setBody(&body);
            }
            self
        }

        /// Sets the default system sound.
        #[must_use]
        pub fn default_sound(self) -> Self {
            let sound = unsafe { UNNotificationSound::defaultSound() };
            unsafe {
                self.content.setSound(Some(&sound));
            }
            self
        }

        #[must_use]
        pub fn build(self) -> Retained<UNMutableNotificationContent> {
            self.content
        }
    }

    impl Default for NotificationContentBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Creates notification content for an expired countdown.
    #[must_use]
    pub fn create_expired_content(
        message: &ExpiryMessage,
    ) -> Retained<UNMutableNotificationContent> {
        NotificationContentBuilder::new()
            .title(&message.title)
            .body(&message.body)
            .default_sound()
            .build()
    }
}
