//! Notification request creation.

use std::time::Duration;

use objc2::rc::Retained;
use objc2_foundation::NSString;
use objc2_user_notifications::{
    UNMutableNotificationContent, UNNotificationRequest, UNNotificationTrigger,
    UNTimeIntervalNotificationTrigger,
};

use super::content::EXPIRED_REQUEST_ID;

/// Creates the expiry request, delivered after `delay`.
///
/// A zero delay delivers immediately (no trigger).
#[must_use]
pub fn create_expired_request(
    content: &UNMutableNotificationContent,
    delay: Duration,
) -> Retained<UNNotificationRequest> {
    let identifier = NSString::from_str(EXPIRED_REQUEST_ID);

    if delay.is_zero() {
        return UNNotificationRequest::requestWithIdentifier_content_trigger(
            &identifier,
            content,
            None,
        );
    }

    let trigger = unsafe {
        UNTimeIntervalNotificationTrigger::triggerWithTimeInterval_repeats(
            delay.as_secs_f64(),
            false,
        )
    };
    let trigger: &UNNotificationTrigger = &trigger;

    UNNotificationRequest::requestWithIdentifier_content_trigger(&identifier, content, Some(trigger))
}
