//! Async bridge to `UNUserNotificationCenter`.
//!
//! The center reports results through Objective-C completion blocks; each
//! call here hands the block one end of a oneshot channel and awaits the
//! other.

use std::cell::RefCell;

use block2::RcBlock;
use objc2::runtime::Bool;
use objc2_foundation::NSError;
use objc2_user_notifications::{
    UNAuthorizationOptions, UNNotificationRequest, UNUserNotificationCenter,
};
use tokio::sync::oneshot;

use super::error::NotificationError;

/// Localized description of a completion error, `None` for success.
fn describe(error: *mut NSError) -> Option<String> {
    // SAFETY: completion handlers pass either null or a live NSError.
    unsafe { error.as_ref() }.map(|e| e.localizedDescription().to_string())
}

/// Takes the sender out of its cell so a block invoked twice reports once.
fn reply<T>(slot: &RefCell<Option<oneshot::Sender<T>>>, value: T) {
    if let Some(sender) = slot.borrow_mut().take() {
        let _ = sender.send(value);
    }
}

/// Asks for alert, sound and badge permission.
///
/// Returns whether the user granted it.
pub async fn request_authorization() -> Result<bool, NotificationError> {
    let (tx, rx) = oneshot::channel();
    let slot = RefCell::new(Some(tx));

    let block = RcBlock::new(move |granted: Bool, error: *mut NSError| {
        let outcome = match describe(error) {
            Some(reason) => Err(NotificationError::AuthorizationFailed(reason)),
            None => Ok(granted.as_bool()),
        };
        reply(&slot, outcome);
    });

    let options =
        UNAuthorizationOptions::Alert | UNAuthorizationOptions::Sound | UNAuthorizationOptions::Badge;
    UNUserNotificationCenter::currentNotificationCenter()
        .requestAuthorizationWithOptions_completionHandler(options, &block);

    rx.await.map_err(|_| {
        NotificationError::InitializationFailed("authorization callback dropped".to_string())
    })?
}

/// Schedules `request`, replacing any pending request with the same id.
pub async fn add_request(request: &UNNotificationRequest) -> Result<(), NotificationError> {
    let (tx, rx) = oneshot::channel();
    let slot = RefCell::new(Some(tx));

    let block = RcBlock::new(move |error: *mut NSError| {
        let outcome = match describe(error) {
            Some(reason) => Err(NotificationError::SendFailed(reason)),
            None => Ok(()),
        };
        reply(&slot, outcome);
    });

    UNUserNotificationCenter::currentNotificationCenter()
        .addNotificationRequest_withCompletionHandler(request, Some(&block));

    rx.await
        .map_err(|_| NotificationError::SendFailed("delivery callback dropped".to_string()))?
}
